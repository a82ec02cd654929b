use crate::{
    error::Error as LiteLlmKeysError, keys::LiteLlmKeyCreateParams, server::app_state::AppState,
    users::Caller,
};
use actix_web::{HttpResponse, web};

/// POST /api/litellm-keys
pub async fn litellm_keys_create(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<LiteLlmKeyCreateParams>,
) -> Result<HttpResponse, LiteLlmKeysError> {
    let key = state.api.keys(&caller).create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(key))
}

#[cfg(test)]
mod tests {
    use super::litellm_keys_create;
    use crate::{
        error::ErrorKind,
        keys::LiteLlmKeyCreateParams,
        tests::{mock_app_state, mock_caller},
        users::UserRole,
    };
    use actix_web::{body::MessageBody, web};
    use serde_json::Value;

    #[tokio::test]
    async fn returns_plain_secret_once() -> anyhow::Result<()> {
        let app_state = web::Data::new(mock_app_state().await?);
        let owner = mock_caller("owner", UserRole::User, &["g1"])?;

        let params = LiteLlmKeyCreateParams {
            key_name: "prod".to_string(),
            api_key: Some("sk-abcdefghijklmnopqrstuvwxyz".to_string()),
            group_ids: Some(vec!["g1".to_string()]),
            ..Default::default()
        };
        let response =
            litellm_keys_create(app_state.clone(), owner.clone(), web::Json(params.clone()))
                .await?;
        assert_eq!(response.status(), 201);

        let body = response
            .into_body()
            .try_into_bytes()
            .map_err(|_| anyhow::anyhow!("unexpected body"))?;
        let key = serde_json::from_slice::<Value>(&body)?;
        assert_eq!(key["api_key"], "sk-abcdefghijklmnopqrstuvwxyz");
        assert_eq!(key["user_id"], "owner");
        assert_eq!(key["is_shared"], false);

        let err = litellm_keys_create(app_state, owner, web::Json(params))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        Ok(())
    }
}
