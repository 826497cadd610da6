use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{self, Role};
use crate::error::{ApiError, AuthError};
use crate::state::AppState;

/// Authenticated identity resolved by the access gate and attached to the
/// request for downstream handlers.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    /// Centralized role check: permit the request only when this identity's
    /// role is on the allow-list. Every role-restricted handler goes through
    /// here; on success the identity passes through unchanged.
    pub fn authorize(&self, allowed: &[Role]) -> Result<&Self, ApiError> {
        if allowed.contains(&self.role) {
            Ok(self)
        } else {
            Err(ApiError::forbidden())
        }
    }
}

/// Access gate: validates the bearer token, re-resolves the embedded identity
/// against the users table and injects it into the request context. Rejects
/// with `missing_token`, `invalid_token` or `unknown_identity`; never mutates.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers())?;
    let claims = auth::validate_jwt(&token)?;

    // The token is stateless; the identity behind it may be gone by now
    let row: Option<(Uuid, String, Role)> =
        sqlx::query_as("SELECT id, username, role FROM users WHERE id = $1")
            .bind(claims.sub)
            .fetch_optional(&state.pool)
            .await
            .map_err(|e| {
                tracing::error!("failed to resolve identity {}: {}", claims.sub, e);
                ApiError::internal("An error occurred while processing your request")
            })?;

    let (id, username, role) = row.ok_or_else(|| {
        tracing::warn!("token identity {} no longer resolves to a user", claims.sub);
        ApiError::unknown_identity()
    })?;

    request.extensions_mut().insert(AuthUser { id, username, role });

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers
        .get("authorization")
        .ok_or(AuthError::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::MissingToken)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        _ => Err(AuthError::MissingToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = value {
            headers.insert("authorization", HeaderValue::from_str(v).unwrap());
        }
        headers
    }

    #[test]
    fn absent_header_is_missing_token() {
        assert_eq!(
            extract_bearer(&headers_with(None)).unwrap_err(),
            AuthError::MissingToken
        );
    }

    #[test]
    fn non_bearer_and_empty_tokens_are_missing() {
        assert_eq!(
            extract_bearer(&headers_with(Some("Basic abc"))).unwrap_err(),
            AuthError::MissingToken
        );
        assert_eq!(
            extract_bearer(&headers_with(Some("Bearer "))).unwrap_err(),
            AuthError::MissingToken
        );
    }

    #[test]
    fn bearer_token_is_extracted() {
        let token = extract_bearer(&headers_with(Some("Bearer abc.def.ghi"))).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn authorize_rejects_roles_outside_the_allow_list() {
        let user = AuthUser {
            id: Uuid::new_v4(),
            username: "student".to_string(),
            role: Role::Student,
        };

        let err = user.authorize(&[Role::Admin]).unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "forbidden");
    }

    #[test]
    fn authorize_passes_listed_roles_through_unchanged() {
        let user = AuthUser {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            role: Role::Admin,
        };

        let passed = user.authorize(&[Role::Admin, Role::Instructor]).unwrap();
        assert_eq!(passed.id, user.id);
        assert_eq!(passed.role, Role::Admin);
    }
}
