use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Sample rate expected by the voice cloning model
pub const TARGET_SAMPLE_RATE: u32 = 22050;
pub const TARGET_CHANNELS: u16 = 1;
pub const TARGET_BITS_PER_SAMPLE: u16 = 16;

/// Container format detected from the leading bytes of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatTag {
    #[serde(rename = "wav")]
    Wav,
    #[serde(rename = "ogg")]
    Ogg,
    #[serde(rename = "mp3")]
    Mp3,
    #[serde(rename = "m4a")]
    M4aMp4,
    #[serde(rename = "webm")]
    Webm,
    #[serde(rename = "unknown")]
    Unknown,
}

impl FormatTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Wav => "wav",
            FormatTag::Ogg => "ogg",
            FormatTag::Mp3 => "mp3",
            FormatTag::M4aMp4 => "m4a",
            FormatTag::Webm => "webm",
            FormatTag::Unknown => "unknown",
        }
    }

    /// File extension used for scratch files handed to the transcoder
    pub fn scratch_extension(&self) -> &'static str {
        match self {
            FormatTag::Unknown => "bin",
            other => other.as_str(),
        }
    }
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

/// Detect the container format from magic numbers in the first 12 bytes
pub fn classify_format(buffer: &[u8]) -> FormatTag {
    if is_canonical_wav(buffer) {
        return FormatTag::Wav;
    }
    if buffer.starts_with(b"OggS") {
        return FormatTag::Ogg;
    }
    if buffer.starts_with(b"ID3") || has_mpeg_frame_sync(buffer) {
        return FormatTag::Mp3;
    }
    if buffer.len() >= 8 && &buffer[4..8] == b"ftyp" {
        return FormatTag::M4aMp4;
    }
    if buffer.starts_with(&EBML_MAGIC) {
        return FormatTag::Webm;
    }
    FormatTag::Unknown
}

/// Container-level check only: "RIFF" at 0..4 and "WAVE" at 8..12.
/// Channel layout, sample rate and bit depth are not inspected.
pub fn is_canonical_wav(buffer: &[u8]) -> bool {
    buffer.len() >= 12 && &buffer[0..4] == b"RIFF" && &buffer[8..12] == b"WAVE"
}

fn has_mpeg_frame_sync(buffer: &[u8]) -> bool {
    buffer.len() >= 2 && buffer[0] == 0xFF && (buffer[1] & 0xE0) == 0xE0
}

/// Parsed fmt chunk of a WAV buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavLayout {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl WavLayout {
    pub fn is_target(&self) -> bool {
        self.channels == TARGET_CHANNELS
            && self.sample_rate == TARGET_SAMPLE_RATE
            && self.bits_per_sample == TARGET_BITS_PER_SAMPLE
    }
}

/// Read the fmt chunk of a WAV buffer, if it parses
pub fn inspect_wav(buffer: &[u8]) -> Option<WavLayout> {
    let reader = hound::WavReader::new(Cursor::new(buffer)).ok()?;
    let spec = reader.spec();
    Some(WavLayout {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
    })
}
