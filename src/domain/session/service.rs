use super::error::SessionServiceError;
use crate::domain::access::{can_access_session, Principal};
use crate::domain::audio::AudioStorage;
use crate::domain::generation::GenerationResponse;
use crate::domain::session::{
    CreateSessionRequest, RenameSessionRequest, SessionResponse, SpeakSession,
    DEFAULT_SESSION_NAME,
};
use crate::domain::shared::validation::required_text;
use crate::infrastructure::repositories::{GeneratedAudioRepository, SessionRepository};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub const MAX_SESSION_NAME_CHARS: usize = 100;

pub struct SessionService {
    session_repo: Arc<dyn SessionRepository>,
    generated_audio_repo: Arc<dyn GeneratedAudioRepository>,
    storage: Arc<AudioStorage>,
}

impl SessionService {
    pub fn new(
        session_repo: Arc<dyn SessionRepository>,
        generated_audio_repo: Arc<dyn GeneratedAudioRepository>,
        storage: Arc<AudioStorage>,
    ) -> Self {
        Self {
            session_repo,
            generated_audio_repo,
            storage,
        }
    }
}

#[async_trait]
pub trait SessionServiceApi: Send + Sync {
    async fn list_sessions(&self, principal: &Principal) -> Result<Vec<SessionResponse>, SessionServiceError>;

    async fn create_session(
        &self,
        principal: &Principal,
        request: CreateSessionRequest,
    ) -> Result<SessionResponse, SessionServiceError>;

    async fn get_session(
        &self,
        principal: &Principal,
        session_id: Uuid,
    ) -> Result<SessionResponse, SessionServiceError>;

    async fn rename_session(
        &self,
        principal: &Principal,
        session_id: Uuid,
        request: RenameSessionRequest,
    ) -> Result<SessionResponse, SessionServiceError>;

    /// Remove every clip blob, then the session row (clips cascade)
    async fn delete_session(&self, principal: &Principal, session_id: Uuid) -> Result<(), SessionServiceError>;

    async fn list_generations(
        &self,
        principal: &Principal,
        session_id: Uuid,
    ) -> Result<Vec<GenerationResponse>, SessionServiceError>;
}

#[async_trait]
impl SessionServiceApi for SessionService {
    async fn list_sessions(&self, principal: &Principal) -> Result<Vec<SessionResponse>, SessionServiceError> {
        let sessions = self.session_repo.find_by_user(principal.user_id).await?;
        Ok(sessions.into_iter().map(SessionResponse::from).collect())
    }

    async fn create_session(
        &self,
        principal: &Principal,
        request: CreateSessionRequest,
    ) -> Result<SessionResponse, SessionServiceError> {
        let name = match request.name.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_SESSION_NAME.to_string(),
            Some(name) => required_text("Name", name, MAX_SESSION_NAME_CHARS)
                .map_err(SessionServiceError::Invalid)?,
        };

        let session = self.session_repo.create(principal.user_id, &name).await?;

        tracing::info!(
            user_id = %principal.user_id,
            session_id = %session.id,
            "Session created"
        );

        Ok(SessionResponse::from(session))
    }

    async fn get_session(
        &self,
        principal: &Principal,
        session_id: Uuid,
    ) -> Result<SessionResponse, SessionServiceError> {
        let session = self.find_accessible(principal, session_id).await?;
        Ok(SessionResponse::from(session))
    }

    async fn rename_session(
        &self,
        principal: &Principal,
        session_id: Uuid,
        request: RenameSessionRequest,
    ) -> Result<SessionResponse, SessionServiceError> {
        let name = required_text("Name", &request.name, MAX_SESSION_NAME_CHARS)
            .map_err(SessionServiceError::Invalid)?;
        let session = self.find_accessible(principal, session_id).await?;

        let renamed = self.session_repo.rename(session.id, &name).await?;

        Ok(SessionResponse::from(renamed))
    }

    async fn delete_session(&self, principal: &Principal, session_id: Uuid) -> Result<(), SessionServiceError> {
        let session = self.find_accessible(principal, session_id).await?;

        let clips = self.generated_audio_repo.find_by_session(session.id).await?;
        for clip in &clips {
            self.storage.delete(&clip.file_path).await?;
        }

        self.session_repo.delete(session.id).await?;

        tracing::info!(
            user_id = %principal.user_id,
            session_id = %session_id,
            clips_removed = clips.len(),
            "Session deleted"
        );

        Ok(())
    }

    async fn list_generations(
        &self,
        principal: &Principal,
        session_id: Uuid,
    ) -> Result<Vec<GenerationResponse>, SessionServiceError> {
        let session = self.find_accessible(principal, session_id).await?;
        let clips = self.generated_audio_repo.find_by_session(session.id).await?;
        Ok(clips.into_iter().map(GenerationResponse::from).collect())
    }
}

impl SessionService {
    /// Missing and foreign sessions are indistinguishable to the caller
    async fn find_accessible(
        &self,
        principal: &Principal,
        session_id: Uuid,
    ) -> Result<SpeakSession, SessionServiceError> {
        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(SessionServiceError::NotFound)?;

        if !can_access_session(principal, &session) {
            return Err(SessionServiceError::NotFound);
        }

        Ok(session)
    }
}
