//! # Authentication Module
//!
//! Resolves the caller's identity once per request and attaches it to
//! handlers as a [`Principal`] (account id + role tag). Handlers then
//! authorize through the principal's `require_*` guards instead of probing
//! for separate user/vendor/admin identities.
//!
//! Token resolution is an opaque lookup against the accounts table; token
//! issuance and expiry are external concerns.

use axum::{extract::FromRequestParts, http::request::Parts};
use bazaar_core::{
    errors::{BazaarError, BazaarResult},
    principal::Principal,
};
use sqlx::PgPool;
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

/// Extractor that authenticates the request from its `Authorization: Bearer`
/// header.
///
/// Rejects with UNAUTHENTICATED when the header is missing, malformed, or
/// names an unknown token.
pub struct AuthPrincipal(pub Principal);

#[async_trait::async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            AppError(BazaarError::Authentication(
                "Missing bearer token".to_string(),
            ))
        })?;

        let principal = resolve_token(&state.db_pool, token).await?;
        Ok(AuthPrincipal(principal))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves an opaque API token to a [`Principal`]. Shared by the HTTP
/// extractor and the chat socket, which authenticates once at connect time.
pub async fn resolve_token(pool: &PgPool, token: &str) -> BazaarResult<Principal> {
    let account = bazaar_db::repositories::account::find_account_by_token(pool, token)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::Authentication("Invalid API token".to_string()))?;

    let role = account.role.parse()?;

    Ok(Principal {
        account_id: account.id,
        role,
    })
}
