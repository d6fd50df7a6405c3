use crate::domain::generation::GeneratedAudio;
use crate::domain::session::SpeakSession;
use crate::domain::voice::Voice;
use uuid::Uuid;

/// Authenticated caller as seen by the access predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Principal {
    pub fn new(user_id: Uuid, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }
}

/// Why a generation request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationDenial {
    SessionDenied,
    VoiceDenied,
}

fn owns_voice(principal: &Principal, voice: &Voice) -> bool {
    principal.user_id == voice.user_id
}

/// Public voices are visible to everyone, private ones only to their owner
pub fn can_view_voice(principal: Option<&Principal>, voice: &Voice) -> bool {
    voice.is_public || principal.map_or(false, |p| owns_voice(p, voice))
}

/// Viewable voices, plus voices the principal saved while they were public
pub fn can_use_voice_for_generation(principal: &Principal, voice: &Voice, has_saved: bool) -> bool {
    can_view_voice(Some(principal), voice) || has_saved
}

pub fn can_mutate_voice(principal: &Principal, voice: &Voice) -> bool {
    owns_voice(principal, voice)
}

pub fn can_save_voice(principal: &Principal, voice: &Voice) -> bool {
    voice.is_public || owns_voice(principal, voice)
}

pub fn can_access_session(principal: &Principal, session: &SpeakSession) -> bool {
    principal.user_id == session.user_id
}

pub fn can_access_generated_audio(principal: &Principal, audio: &GeneratedAudio) -> bool {
    principal.user_id == audio.user_id
}

pub fn can_manage_genres(principal: &Principal) -> bool {
    principal.is_admin
}

/// Session ownership is checked before voice usability
pub fn can_generate_in_session(
    principal: &Principal,
    session: &SpeakSession,
    voice: &Voice,
    has_saved: bool,
) -> Result<(), GenerationDenial> {
    if !can_access_session(principal, session) {
        return Err(GenerationDenial::SessionDenied);
    }
    if !can_use_voice_for_generation(principal, voice, has_saved) {
        return Err(GenerationDenial::VoiceDenied);
    }
    Ok(())
}
