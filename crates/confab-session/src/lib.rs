pub mod controller;
pub mod error;
pub mod events;
pub mod persister;

pub use controller::{SessionController, SessionPhase, GATEWAY_ERROR_REPLY};
pub use error::{Result, SessionError};
pub use events::SessionEvent;
pub use persister::PersistQueue;
