pub mod events;
pub mod landscape;
pub mod network;
pub mod play;
