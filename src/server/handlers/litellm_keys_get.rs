use crate::{error::Error as LiteLlmKeysError, server::app_state::AppState, users::Caller};
use actix_web::{HttpResponse, web};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct KeyIdPath {
    pub key_id: String,
}

/// GET /api/litellm-keys/{key_id}
pub async fn litellm_keys_get(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<KeyIdPath>,
) -> Result<HttpResponse, LiteLlmKeysError> {
    let key = state.api.keys(&caller).get(&path.key_id).await?;
    Ok(HttpResponse::Ok().json(key))
}

/// GET /api/litellm-keys/{key_id}/status
pub async fn litellm_keys_status(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<KeyIdPath>,
) -> Result<HttpResponse, LiteLlmKeysError> {
    let status = state.api.keys(&caller).status(&path.key_id).await?;
    Ok(HttpResponse::Ok().json(status))
}
