pub mod handler;
pub mod hub;

pub use handler::ws_handler;
pub use hub::{spawn_snapshot_pump, ClientHub};
