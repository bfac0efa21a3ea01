// This binary crate is intentionally minimal.
// All engine logic lives in the library (src/lib.rs and its modules).
// Run the demos or the JSON feed with:
//   cargo run --example xor
//   cargo run --bin studio
fn main() {
    println!("ferrite-backprop: a two-layer network engine with full step introspection.");
    println!("Run `cargo run --example xor` to watch it learn XOR,");
    println!("or `cargo run --bin studio` to serve training steps as JSON.");
}
