use super::policy::{can_view_voice, Principal};
use crate::domain::voice::Voice;
use std::fmt::Display;
use uuid::Uuid;

pub const LOGIN_PATH: &str = "/login";
pub const VOICE_ACCESS_DENIED_REDIRECT: &str = "/dashboard?error=voice_access_denied";

const PROTECTED_PREFIXES: [&str; 2] = ["/dashboard", "/voice"];

/// How the page gate treats a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRoute {
    Public,
    Protected,
    /// `/voice/<uuid>`: protected, plus a per-voice visibility check
    VoiceDetail(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Redirect(String),
}

pub fn classify_path(path: &str) -> PageRoute {
    let protected = PROTECTED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .map_or(false, |rest| rest.is_empty() || rest.starts_with('/'))
    });
    if !protected {
        return PageRoute::Public;
    }

    if let Some(rest) = path.strip_prefix("/voice/") {
        let segment = rest.strip_suffix('/').unwrap_or(rest);
        if !segment.contains('/') {
            if let Ok(voice_id) = Uuid::parse_str(segment) {
                return PageRoute::VoiceDetail(voice_id);
            }
        }
    }

    PageRoute::Protected
}

/// `/login?callbackUrl=<encoded original path and query>`
pub fn login_redirect(path_and_query: &str) -> String {
    format!(
        "{}?callbackUrl={}",
        LOGIN_PATH,
        urlencoding::encode(path_and_query)
    )
}

/// Gate decision before any resource lookup: public paths pass, protected
/// ones need a principal.
pub fn require_principal(route: PageRoute, principal: Option<&Principal>, path_and_query: &str) -> NavigationDecision {
    match (route, principal) {
        (PageRoute::Public, _) => NavigationDecision::Allow,
        (_, None) => NavigationDecision::Redirect(login_redirect(path_and_query)),
        (_, Some(_)) => NavigationDecision::Allow,
    }
}

/// Decision for `/voice/<uuid>` once the voice lookup has completed.
/// Missing voices and lookup failures fall through to the page.
pub fn decide_voice_access<E: Display>(
    principal: &Principal,
    voice_id: Uuid,
    lookup: Result<Option<Voice>, E>,
) -> NavigationDecision {
    match lookup {
        Ok(Some(voice)) if can_view_voice(Some(principal), &voice) => NavigationDecision::Allow,
        Ok(Some(_)) => {
            tracing::info!(
                user_id = %principal.user_id,
                voice_id = %voice_id,
                "Voice page access denied"
            );
            NavigationDecision::Redirect(VOICE_ACCESS_DENIED_REDIRECT.to_string())
        }
        Ok(None) => NavigationDecision::Allow,
        Err(e) => {
            tracing::error!(
                voice_id = %voice_id,
                error = %e,
                "Voice lookup failed during navigation, allowing request"
            );
            NavigationDecision::Allow
        }
    }
}
