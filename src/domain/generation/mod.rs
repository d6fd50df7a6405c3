pub mod emotion;
pub mod error;
pub mod model;
pub mod service;

pub use emotion::Emotion;
pub use error::GenerationServiceError;
pub use model::{
    GenerateRequest, GeneratedAudio, GenerationResponse, NewGeneratedAudio, SignedUrlResponse,
    UpdateGenerationRequest,
};
pub use service::{GenerationService, GenerationServiceApi};
