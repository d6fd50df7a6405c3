use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use std::sync::Arc;
use uuid::Uuid;

use voicecast_backend::domain::user::User;
use voicecast_backend::domain::voice::{NewVoice, Voice};
use voicecast_backend::infrastructure::repositories::{
    GenreRepository, SavedVoiceRepository, SessionRepository, VoiceRepository,
};
use voicecast_backend::domain::genre::Genre;
use voicecast_backend::domain::session::SpeakSession;
use voicecast_backend::infrastructure::storage::BlobStore;

use super::fakes::MemoryBlobStore;
use super::memory_store::InMemoryStore;

/// 16-bit PCM WAV of silence
pub fn wav_bytes(sample_rate: u32, channels: u16, seconds: f32) -> Vec<u8> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let frames = (sample_rate as f32 * seconds) as u32;
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).expect("wav writer");
        for _ in 0..frames * channels as u32 {
            writer.write_sample(0i16).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// Bytes that sniff as MP3 (ID3 tag) but are not WAV
pub fn mp3_bytes() -> Vec<u8> {
    let mut bytes = b"ID3\x04\x00\x00\x00\x00\x00\x00".to_vec();
    bytes.extend(std::iter::repeat(0x55u8).take(512));
    bytes
}

/// Seeds rows straight into the store, bypassing the HTTP layer
pub struct TestFixtures {
    store: Arc<InMemoryStore>,
    blobs: Arc<MemoryBlobStore>,
    reference_bucket: String,
}

impl TestFixtures {
    pub fn new(store: Arc<InMemoryStore>, blobs: Arc<MemoryBlobStore>, reference_bucket: &str) -> Self {
        Self {
            store,
            blobs,
            reference_bucket: reference_bucket.to_string(),
        }
    }

    pub fn create_user(&self, email: &str) -> User {
        self.store.insert_user(email, false)
    }

    pub fn create_admin(&self, email: &str) -> User {
        self.store.insert_user(email, true)
    }

    /// Voice with a stored canonical reference sample
    pub async fn create_voice(&self, owner: Uuid, name: &str, is_public: bool) -> Voice {
        let key = format!("{}.wav", Uuid::new_v4());
        self.blobs
            .put(&self.reference_bucket, &key, wav_bytes(22050, 1, 0.5), "audio/wav")
            .await
            .expect("store reference sample");

        VoiceRepository::create(
            self.store.as_ref(),
            NewVoice {
                name: name.to_string(),
                description: None,
                audio_sample: format!("memory://{}/{}", self.reference_bucket, key),
                is_public,
                gender: None,
                genre_id: None,
                user_id: owner,
            },
        )
        .await
        .expect("create voice")
    }

    pub async fn create_session(&self, owner: Uuid, name: &str) -> SpeakSession {
        SessionRepository::create(self.store.as_ref(), owner, name)
            .await
            .expect("create session")
    }

    pub async fn create_genre(&self, name: &str) -> Genre {
        GenreRepository::create(self.store.as_ref(), name)
            .await
            .expect("create genre")
    }

    pub async fn save_voice(&self, user_id: Uuid, voice_id: Uuid) {
        SavedVoiceRepository::save(self.store.as_ref(), user_id, voice_id)
            .await
            .expect("save voice");
    }

    pub async fn assign_genre(&self, voice_id: Uuid, genre_id: Uuid) -> Voice {
        let mut voice = self.store.voice(voice_id).expect("voice exists");
        voice.genre_id = Some(genre_id);
        VoiceRepository::update(self.store.as_ref(), &voice)
            .await
            .expect("assign genre")
    }
}
