use crate::{error::Error as LiteLlmKeysError, server::app_state::AppState, users::Caller};
use actix_web::{HttpResponse, web};

/// GET /api/litellm-keys/health/connection
pub async fn litellm_keys_connection(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, LiteLlmKeysError> {
    let status = state.api.gateway_keys(&caller).connection_status().await?;
    Ok(HttpResponse::Ok().json(status))
}
