//! Authentication middleware
//!
//! Verifies access tokens issued by the hosted auth provider and exposes the
//! caller's role and client binding to handlers.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use shared::UserRole;
use uuid::Uuid;

use crate::error::{AppError, AppResult, ErrorDetail, ErrorResponse};
use crate::AppState;

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: UserRole,
    pub client_id: Option<Uuid>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail unless the caller is warehouse staff
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::InsufficientPermissions)
        }
    }

    /// Client whose data the caller is restricted to; `None` means unrestricted
    pub fn client_scope(&self) -> AppResult<Option<Uuid>> {
        match (self.role, self.client_id) {
            (UserRole::Admin, _) => Ok(None),
            (UserRole::Client, Some(client_id)) => Ok(Some(client_id)),
            (UserRole::Client, None) => Err(AppError::InsufficientPermissions),
        }
    }
}

/// Authentication middleware that validates JWT tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(token) => token.to_owned(),
        None => {
            return AppError::Unauthorized {
                message: "Missing or invalid Authorization header".to_string(),
                message_es: "Falta el encabezado de autorización".to_string(),
            }
            .into_response();
        }
    };

    let auth_user = match verify_token(&token, &state.config.auth.jwt_secret, &state.config.auth.audience) {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    tracing::debug!(user_id = %auth_user.user_id, role = %auth_user.role, "request authenticated");
    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

/// Role and client binding set by portal administrators
#[derive(Debug, Default, Deserialize)]
struct AppMetadata {
    role: Option<String>,
    client_id: Option<Uuid>,
}

/// JWT claims structure
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    app_metadata: AppMetadata,
}

/// Decode and validate a JWT token
pub fn verify_token(token: &str, secret: &str, audience: &str) -> AppResult<AuthUser> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[audience]);

    let claims = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;
    let role = claims
        .app_metadata
        .role
        .as_deref()
        .map(UserRole::from_claim)
        .unwrap_or_default();

    Ok(AuthUser {
        user_id,
        email: claims.email,
        role,
        client_id: claims.app_metadata.client_id,
    })
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message_en: "Authentication required".to_string(),
                        message_es: "Debe iniciar sesión".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}
