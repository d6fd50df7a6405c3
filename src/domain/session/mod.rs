pub mod error;
pub mod model;
pub mod service;

pub use error::SessionServiceError;
pub use model::{
    CreateSessionRequest, RenameSessionRequest, SessionResponse, SpeakSession,
    DEFAULT_SESSION_NAME,
};
pub use service::{SessionService, SessionServiceApi};
