use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::domain::access::Principal;
use crate::infrastructure::config::Config;
use crate::{
    domain::auth::JwtManager,
    error::{AppError, AppResult},
    infrastructure::repositories::UserRepository,
};
use uuid::Uuid;

/// Cookie carrying the bearer token for browser navigation and playback
pub const SESSION_COOKIE: &str = "voicecast_token";

/// User context injected into request extensions after authentication
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

impl AuthUser {
    pub fn principal(&self) -> Principal {
        Principal::new(self.user_id, self.is_admin)
    }
}

/// Present on routes where authentication is optional
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn principal(&self) -> Option<Principal> {
        self.0.as_ref().map(AuthUser::principal)
    }
}

/// Token from `Authorization: Bearer`, falling back to the session cookie
pub fn extract_token(headers: &HeaderMap) -> AppResult<Option<String>> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let auth_header = value
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid authorization format".to_string()))?;
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid authorization format".to_string()))?;
        return Ok(Some(token.trim().to_string()));
    }

    Ok(cookie_token(headers))
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Validate the token and load the user it names
pub async fn resolve_user(
    user_repo: &dyn UserRepository,
    config: &Config,
    token: &str,
) -> AppResult<AuthUser> {
    let jwt_manager = JwtManager::new(config.jwt_secret.clone());
    let user_id = jwt_manager.extract_user_id(token)?;

    let user = user_repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
        is_admin: user.is_admin,
    })
}

/// Authentication middleware
pub async fn auth_middleware(
    State((user_repo, config)): State<(Arc<dyn UserRepository>, Arc<Config>)>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers())?
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let auth_user = resolve_user(user_repo.as_ref(), &config, &token).await?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Like `auth_middleware`, but anonymous and invalid credentials pass
/// through as `MaybeAuthUser(None)`.
pub async fn optional_auth_middleware(
    State((user_repo, config)): State<(Arc<dyn UserRepository>, Arc<Config>)>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // A malformed Authorization header is rejected; a bad token is anonymous
    let auth_user = match extract_token(request.headers())? {
        Some(token) => match resolve_user(user_repo.as_ref(), &config, &token).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid credentials on optional-auth route");
                None
            }
        },
        None => None,
    };

    request.extensions_mut().insert(MaybeAuthUser(auth_user));

    Ok(next.run(request).await)
}
