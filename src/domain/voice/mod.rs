pub mod error;
pub mod model;
pub mod service;

pub use error::VoiceServiceError;
pub use model::{
    NewVoice, PublicVoiceQuery, SavedVoice, UpdateVoiceRequest, Voice, VoiceGender, VoiceResponse,
    VoiceUpload,
};
pub use service::{VoiceService, VoiceServiceApi};
