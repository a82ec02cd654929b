use crate::{
    error::Error as LiteLlmKeysError, keys::KeysPageParams, server::app_state::AppState,
    users::Caller,
};
use actix_web::{HttpResponse, web};

/// GET /api/litellm-keys
pub async fn litellm_keys_list(
    state: web::Data<AppState>,
    caller: Caller,
    page: web::Query<KeysPageParams>,
) -> Result<HttpResponse, LiteLlmKeysError> {
    let keys = state.api.keys(&caller).list_owned(page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(keys))
}

/// GET /api/litellm-keys/groups/accessible
pub async fn litellm_keys_list_accessible(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, LiteLlmKeysError> {
    let keys = state.api.keys(&caller).list_accessible().await?;
    Ok(HttpResponse::Ok().json(keys))
}

/// GET /api/litellm-keys/admin/all
pub async fn litellm_keys_list_all(
    state: web::Data<AppState>,
    caller: Caller,
    page: web::Query<KeysPageParams>,
) -> Result<HttpResponse, LiteLlmKeysError> {
    let keys = state.api.keys(&caller).list_all(page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(keys))
}
