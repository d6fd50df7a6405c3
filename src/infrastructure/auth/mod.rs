pub mod middleware;
pub mod navigation;
pub mod request_id;

pub use middleware::{
    auth_middleware, extract_token, optional_auth_middleware, resolve_user, AuthUser,
    MaybeAuthUser, SESSION_COOKIE,
};
pub use navigation::{navigation_guard, NavigationGuardState};
pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};
