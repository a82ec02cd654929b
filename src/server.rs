mod app_state;
mod extractors;
mod handlers;
mod status;

use crate::{api::Api, config::Config, database::Database, network::Network};
use actix_web::{App, HttpServer, middleware, web};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use self::app_state::AppState;

#[actix_web::main]
pub async fn run(config: Config) -> Result<(), anyhow::Error> {
    let db = Database::open(&config.db).await?;
    let network = Network::from_config(&config.http.client)?;
    let http_server_url = format!("0.0.0.0:{}", config.http_port);
    let api = Api::new(config, db, network);

    info!(
        backend = ?api.config.keys.backend,
        gateway.url = %api.config.gateway.url,
        host.url = %api.config.host.url,
        "LiteLLM keys API is configured."
    );

    let state = web::Data::new(AppState::new(api));
    let http_server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::NormalizePath::trim())
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(configure_routes)
    });

    let http_server = http_server
        .bind(&http_server_url)
        .with_context(|| format!("Failed to bind to {}.", &http_server_url))?;

    info!("LiteLLM keys API server is available at http://{http_server_url}");

    http_server
        .run()
        .await
        .with_context(|| "Failed to run LiteLLM keys API server.")
}

/// Registers the API routes. Static key routes must go before the `{key_id}` ones.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/status", web::get().to(handlers::status_get))
            .service(
                web::scope("/litellm-keys")
                    .route("", web::get().to(handlers::litellm_keys_list))
                    .route("", web::post().to(handlers::litellm_keys_create))
                    .route(
                        "/groups/accessible",
                        web::get().to(handlers::litellm_keys_list_accessible),
                    )
                    .route("/admin/all", web::get().to(handlers::litellm_keys_list_all))
                    .route(
                        "/health/connection",
                        web::get().to(handlers::litellm_keys_connection),
                    )
                    .route("/{key_id}", web::get().to(handlers::litellm_keys_get))
                    .route("/{key_id}", web::put().to(handlers::litellm_keys_update))
                    .route("/{key_id}", web::delete().to(handlers::litellm_keys_delete))
                    .route(
                        "/{key_id}/status",
                        web::get().to(handlers::litellm_keys_status),
                    ),
            ),
    );
}

#[cfg(test)]
pub mod tests {
    use super::configure_routes;
    use crate::{
        config::Config,
        server::AppState,
        tests::{mock_api_with_config, mock_config},
    };
    use actix_web::{
        App,
        http::StatusCode,
        middleware::NormalizePath,
        test::{TestRequest, call_service, init_service, read_body_json},
        web,
    };
    use httpmock::MockServer;
    use serde_json::{Value, json};
    use url::Url;

    pub async fn mock_app_state() -> anyhow::Result<AppState> {
        mock_app_state_with_config(mock_config()?).await
    }

    pub async fn mock_app_state_with_config(config: Config) -> anyhow::Result<AppState> {
        Ok(AppState::new(mock_api_with_config(config).await?))
    }

    fn mock_host_user(server: &MockServer, token: &str, id: &str, role: &str) {
        let token = format!("Bearer {token}");
        let user = json!({ "id": id, "role": role });
        server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/api/v1/auths/")
                .header("Authorization", &token);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(user);
        });
    }

    #[actix_web::test]
    async fn serves_key_lifecycle() -> anyhow::Result<()> {
        let host = MockServer::start();
        mock_host_user(&host, "owner-token", "owner", "user");
        mock_host_user(&host, "member-token", "member", "user");
        mock_host_user(&host, "pending-token", "pending", "pending");
        host.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/api/v1/auths/");
            then.status(401);
        });
        host.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/api/v1/groups/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([
                    { "id": "g1", "name": "ML", "user_ids": ["owner", "member"] }
                ]));
        });

        let mut config = mock_config()?;
        config.host.url = Url::parse(&host.base_url())?;
        let app = init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .app_data(web::Data::new(mock_app_state_with_config(config).await?))
                .configure(configure_routes),
        )
        .await;

        let response = call_service(
            &app,
            TestRequest::get().uri("/api/status").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        for (token, status) in [
            (None, StatusCode::UNAUTHORIZED),
            (Some("unknown-token"), StatusCode::UNAUTHORIZED),
            (Some("pending-token"), StatusCode::FORBIDDEN),
        ] {
            let mut request = TestRequest::get().uri("/api/litellm-keys/");
            if let Some(token) = token {
                request = request.insert_header(("Authorization", format!("Bearer {token}")));
            }
            assert_eq!(call_service(&app, request.to_request()).await.status(), status);
        }

        let response = call_service(
            &app,
            TestRequest::post()
                .uri("/api/litellm-keys")
                .insert_header(("Authorization", "Bearer owner-token"))
                .set_json(json!({
                    "key_name": "prod",
                    "api_key": "sk-abcdefghijklmnopqrstuvwxyz",
                    "groups": ["g1"]
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Value = read_body_json(response).await;
        assert_eq!(created["api_key"], "sk-abcdefghijklmnopqrstuvwxyz");
        let key_id = created["id"].as_str().unwrap_or_default().to_string();

        let response = call_service(
            &app,
            TestRequest::get()
                .uri(&format!("/api/litellm-keys/{key_id}"))
                .insert_header(("Authorization", "Bearer member-token"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let key: Value = read_body_json(response).await;
        assert_eq!(key["api_key"], "sk-abcde*****************wxyz");
        assert_eq!(key["is_shared"], true);

        let response = call_service(
            &app,
            TestRequest::get()
                .uri("/api/litellm-keys/groups/accessible")
                .insert_header(("Authorization", "Bearer member-token"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let page: Value = read_body_json(response).await;
        assert_eq!(page["total"], 1);

        let response = call_service(
            &app,
            TestRequest::get()
                .uri("/api/litellm-keys/admin/all")
                .insert_header(("Authorization", "Bearer owner-token"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = call_service(
            &app,
            TestRequest::put()
                .uri(&format!("/api/litellm-keys/{key_id}"))
                .insert_header(("Authorization", "Bearer member-token"))
                .set_json(json!({ "key_name": "hijacked" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body: Value = read_body_json(response).await;
        assert_eq!(body, json!({ "message": "Access Forbidden" }));

        let response = call_service(
            &app,
            TestRequest::delete()
                .uri(&format!("/api/litellm-keys/{key_id}"))
                .insert_header(("Authorization", "Bearer member-token"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        for status in [StatusCode::NO_CONTENT, StatusCode::NOT_FOUND] {
            let response = call_service(
                &app,
                TestRequest::delete()
                    .uri(&format!("/api/litellm-keys/{key_id}"))
                    .insert_header(("Authorization", "Bearer owner-token"))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), status);
        }

        Ok(())
    }
}
