pub mod error;
pub mod format;
pub mod normalizer;
pub mod storage;

pub use error::AudioError;
pub use format::{classify_format, inspect_wav, is_canonical_wav, FormatTag, WavLayout};
pub use normalizer::{AudioNormalizer, NormalizedAudio};
pub use storage::{AudioNamespace, AudioStorage, CanonicalPath};
