pub mod navigation;
pub mod policy;

pub use navigation::{
    classify_path, decide_voice_access, login_redirect, require_principal, NavigationDecision,
    PageRoute, VOICE_ACCESS_DENIED_REDIRECT,
};
pub use policy::{
    can_access_generated_audio, can_access_session, can_generate_in_session, can_manage_genres,
    can_mutate_voice, can_save_voice, can_use_voice_for_generation, can_view_voice,
    GenerationDenial, Principal,
};
