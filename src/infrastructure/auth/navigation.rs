use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::middleware::{extract_token, resolve_user};
use crate::domain::access::{
    classify_path, decide_voice_access, require_principal, NavigationDecision, PageRoute,
    Principal,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::{UserRepository, VoiceRepository};

#[derive(Clone)]
pub struct NavigationGuardState {
    pub user_repo: Arc<dyn UserRepository>,
    pub voice_repo: Arc<dyn VoiceRepository>,
    pub config: Arc<Config>,
}

impl NavigationGuardState {
    async fn principal(&self, token: Option<String>) -> Option<Principal> {
        let token = token?;
        match resolve_user(self.user_repo.as_ref(), &self.config, &token).await {
            Ok(user) => Some(user.principal()),
            Err(e) => {
                tracing::debug!(error = %e, "Navigation request carries unusable credentials");
                None
            }
        }
    }
}

/// Page gate in front of the frontend bundle
pub async fn navigation_guard(
    State(state): State<NavigationGuardState>,
    request: Request,
    next: Next,
) -> Response {
    let route = classify_path(request.uri().path());
    if route == PageRoute::Public {
        return next.run(request).await;
    }

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    // Pulled out before awaiting; the request itself is not Sync
    let token = extract_token(request.headers()).ok().flatten();
    let principal = state.principal(token).await;

    let decision = match require_principal(route, principal.as_ref(), &path_and_query) {
        NavigationDecision::Allow => match (route, principal.as_ref()) {
            (PageRoute::VoiceDetail(voice_id), Some(principal)) => {
                let lookup = state.voice_repo.find_by_id(voice_id).await;
                decide_voice_access(principal, voice_id, lookup)
            }
            _ => NavigationDecision::Allow,
        },
        redirect => redirect,
    };

    match decision {
        NavigationDecision::Allow => next.run(request).await,
        NavigationDecision::Redirect(location) => {
            tracing::debug!(path = %path_and_query, location = %location, "Redirecting page request");
            Redirect::temporary(&location).into_response()
        }
    }
}
