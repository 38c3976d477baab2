use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use khatm_types::api::Claims;

use crate::AppState;
use crate::error::ApiError;

/// Extract and validate the auth provider's JWT from the Authorization
/// header, then lazily provision the profile row keyed by the subject id.
/// The claims are trusted verbatim once the signature checks out.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthenticated)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthenticated)?;

    let claims = token_data.claims;
    state.db.ensure_profile(
        &claims.sub.to_string(),
        default_display_name(&claims).as_deref(),
        claims.picture.as_deref(),
    )?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Provider `name` claim, falling back to the email local part.
fn default_display_name(claims: &Claims) -> Option<String> {
    claims.name.clone().or_else(|| {
        claims
            .email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .map(str::to_string)
    })
}
