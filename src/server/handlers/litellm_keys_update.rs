use crate::{
    error::Error as LiteLlmKeysError, keys::LiteLlmKeyUpdateParams,
    server::{app_state::AppState, handlers::litellm_keys_get::KeyIdPath},
    users::Caller,
};
use actix_web::{HttpResponse, web};

/// PUT /api/litellm-keys/{key_id}
pub async fn litellm_keys_update(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<KeyIdPath>,
    body: web::Json<LiteLlmKeyUpdateParams>,
) -> Result<HttpResponse, LiteLlmKeysError> {
    let key = state
        .api
        .keys(&caller)
        .update(&path.key_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(key))
}

#[cfg(test)]
mod tests {
    use super::litellm_keys_update;
    use crate::{
        error::ErrorKind,
        keys::{LiteLlmKeyCreateParams, LiteLlmKeyUpdateParams},
        server::handlers::litellm_keys_get::KeyIdPath,
        tests::{mock_app_state, mock_caller},
        users::UserRole,
    };
    use actix_web::{body::MessageBody, web};
    use serde_json::Value;

    #[tokio::test]
    async fn only_owners_and_admins_can_update() -> anyhow::Result<()> {
        let app_state = web::Data::new(mock_app_state().await?);
        let owner = mock_caller("owner", UserRole::User, &["g1"])?;
        let key = app_state
            .api
            .keys(&owner)
            .create(LiteLlmKeyCreateParams {
                key_name: "prod".to_string(),
                api_key: Some("sk-abcdefghijklmnopqrstuvwxyz".to_string()),
                group_ids: Some(vec!["g1".to_string()]),
                ..Default::default()
            })
            .await?;
        let path = || {
            web::Path::from(KeyIdPath {
                key_id: key.id.clone(),
            })
        };
        let update = LiteLlmKeyUpdateParams {
            description: Some("Production".to_string()),
            ..Default::default()
        };

        let member = mock_caller("member", UserRole::User, &["g1"])?;
        let err = litellm_keys_update(app_state.clone(), member, path(), web::Json(update.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccessForbidden);

        let err = litellm_keys_update(
            app_state.clone(),
            owner.clone(),
            path(),
            web::Json(LiteLlmKeyUpdateParams::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ClientError);

        let admin = mock_caller("admin", UserRole::Admin, &[])?;
        let response = litellm_keys_update(app_state, admin, path(), web::Json(update)).await?;
        assert_eq!(response.status(), 200);
        let body = response
            .into_body()
            .try_into_bytes()
            .map_err(|_| anyhow::anyhow!("unexpected body"))?;
        let body = serde_json::from_slice::<Value>(&body)?;
        assert_eq!(body["description"], "Production");
        assert_eq!(body["user_id"], "owner");
        assert_eq!(body["api_key"], "sk-abcde*****************wxyz");

        Ok(())
    }
}
