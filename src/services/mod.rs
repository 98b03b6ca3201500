pub mod admin_service;
pub mod config_resolver;
pub mod draw_service;
pub mod message_service;
pub mod session_service;

pub use admin_service::*;
pub use config_resolver::*;
pub use draw_service::*;
pub use message_service::*;
pub use session_service::*;
