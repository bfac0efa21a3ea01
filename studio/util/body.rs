use std::io::Read;

use serde::de::DeserializeOwned;
use tiny_http::Request;

/// Largest request body the studio will read.
const MAX_BODY_BYTES: u64 = 1 << 20;

/// Reads the request body as JSON. An empty body yields `T::default()`, so
/// endpoints whose parameters are all optional can be called bare.
pub fn read_json<T: DeserializeOwned + Default>(request: &mut Request) -> Result<T, String> {
    let mut raw = String::new();
    Read::take(request.as_reader(), MAX_BODY_BYTES)
        .read_to_string(&mut raw)
        .map_err(|e| format!("could not read request body: {e}"))?;

    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&raw).map_err(|e| format!("invalid JSON body: {e}"))
}
