use crate::{error::Error as LiteLlmKeysError, server::app_state::AppState, users::Caller};
use actix_web::{
    Error, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web,
};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use anyhow::anyhow;
use std::{future::Future, pin::Pin};
use tracing::{error, warn};

impl FromRequest for Caller {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = web::Data::<AppState>::extract(&req).await?;

            let Some(bearer_auth) = Option::<BearerAuth>::extract(&req).await? else {
                return Err(ErrorUnauthorized(anyhow!("Unauthorized")));
            };

            match state.api.security().authenticate(bearer_auth.token()).await {
                Ok(Some(caller)) if caller.role.can_manage_keys() => Ok(caller),
                Ok(Some(caller)) => {
                    warn!(user.id = %caller.id, "User isn't allowed to manage LiteLLM keys.");
                    Err(LiteLlmKeysError::access_forbidden().into())
                }
                Ok(None) => Err(ErrorUnauthorized(anyhow!("Unauthorized"))),
                Err(err) => {
                    error!("Failed to resolve the caller due to: {err:?}");
                    Err(LiteLlmKeysError::from(err).into())
                }
            }
        })
    }
}
