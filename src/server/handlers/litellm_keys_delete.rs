use crate::{
    error::Error as LiteLlmKeysError,
    server::{app_state::AppState, handlers::litellm_keys_get::KeyIdPath},
    users::Caller,
};
use actix_web::{HttpResponse, web};

/// DELETE /api/litellm-keys/{key_id}
pub async fn litellm_keys_delete(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<KeyIdPath>,
) -> Result<HttpResponse, LiteLlmKeysError> {
    state.api.keys(&caller).delete(&path.key_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
