//! HTTP routes.
//!
//! `POST /create-user` is called from browsers on another origin, so every
//! route sits behind a permissive CORS layer that answers pre-flight
//! requests before any handler runs.

use crate::config::Config;
use crate::i18n::{MetricsReport, TranslationMetrics};
use crate::provisioning::{
    AuthApiClient, ProvisionError, ProvisionRequest, ProvisionResult, Provisioner,
};
use crate::testimonial::{synchronize, StoredTestimonial, TestimonialRecord};
use crate::translation::{HttpTranslator, Translator};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared handles for all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<dyn Translator>,
    pub provisioner: Arc<Provisioner>,
}

impl AppState {
    pub fn new(translator: Arc<dyn Translator>, provisioner: Arc<Provisioner>) -> Self {
        Self {
            translator,
            provisioner,
        }
    }

    /// Wire the HTTP-backed collaborators from configuration.
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::new();
        let translator = HttpTranslator::from_config(client.clone(), config);
        let auth = Arc::new(AuthApiClient::from_config(client, config));

        Self::new(
            Arc::new(translator),
            Arc::new(Provisioner::with_backend(auth, config.privileged_role.clone())),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub record: TestimonialRecord,
    pub stored: StoredTestimonial,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// OPTIONS /create-user without CORS request headers
async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// POST /create-user
async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProvisionRequest>, JsonRejection>,
) -> Result<Json<ProvisionResult>, ProvisionError> {
    let caller = state.provisioner.authorize(bearer_token(&headers)).await?;
    let Json(request) = payload.map_err(|e| ProvisionError::InvalidRequest(e.body_text()))?;

    let result = state.provisioner.create_user(&caller, &request).await?;

    Ok(Json(result))
}

/// POST /testimonials/sync
async fn sync_testimonial(
    State(state): State<AppState>,
    Json(record): Json<TestimonialRecord>,
) -> Json<SyncResponse> {
    let source = record.source_language;
    let record = synchronize(state.translator.as_ref(), record, source).await;
    let stored = record.to_stored();

    Json(SyncResponse { record, stored })
}

/// GET /translation/metrics
async fn translation_metrics() -> Json<MetricsReport> {
    Json(TranslationMetrics::global().report())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/create-user", post(create_user).options(preflight))
        .route("/testimonials/sync", post(sync_testimonial))
        .route("/translation/metrics", get(translation_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &Config, state: AppState) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::provisioning::{
        AccountCreator, AccountDescriptor, Identity, IdentityVerifier, LinkGenerator, LinkType,
        NewAccount, RoleStore,
    };
    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serial_test::serial;
    use tower::ServiceExt;

    struct UppercaseTranslator;

    #[async_trait]
    impl Translator for UppercaseTranslator {
        async fn request_translation(
            &self,
            text: &str,
            _from: Language,
            _to: Language,
        ) -> Result<String> {
            Ok(text.to_uppercase())
        }
    }

    /// Accepts only "valid-token" and gives that caller `role`.
    struct StaticBackend {
        role: &'static str,
    }

    #[async_trait]
    impl IdentityVerifier for StaticBackend {
        async fn verify(&self, bearer_token: &str) -> Result<Option<Identity>> {
            Ok((bearer_token == "valid-token").then(|| Identity {
                id: "caller".into(),
                email: None,
            }))
        }
    }

    #[async_trait]
    impl RoleStore for StaticBackend {
        async fn role_for(&self, _identity: &Identity) -> Result<Option<String>> {
            Ok(Some(self.role.to_string()))
        }
    }

    #[async_trait]
    impl AccountCreator for StaticBackend {
        async fn create_account(&self, account: &NewAccount) -> Result<AccountDescriptor> {
            Ok(AccountDescriptor {
                id: "new-user".into(),
                email: Some(account.email.clone()),
                created_at: None,
                user_metadata: serde_json::Value::Null,
            })
        }
    }

    #[async_trait]
    impl LinkGenerator for StaticBackend {
        async fn generate_link(&self, _link_type: LinkType, _email: &str) -> Result<String> {
            Ok("https://auth.example.com/verify?token=t&type=recovery".into())
        }
    }

    fn app(role: &'static str) -> Router {
        let provisioner = Provisioner::with_backend(Arc::new(StaticBackend { role }), "teacher");
        router(AppState::new(
            Arc::new(UppercaseTranslator),
            Arc::new(provisioner),
        ))
    }

    fn create_user_request(token: Option<&str>, body: serde_json::Value) -> Request<Body> {
        raw_create_user_request(token, body.to_string())
    }

    fn raw_create_user_request(token: Option<&str>, body: impl Into<Body>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/create-user")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(body.into()).unwrap()
    }

    fn provision_body() -> serde_json::Value {
        serde_json::json!({
            "email": "student@example.com",
            "fullName": "Ana Lima",
            "role": "student",
            "preferredLanguage": "pt"
        })
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ==================== bearer_token Tests ====================

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, "bearer xyz".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("xyz"));

        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    // ==================== Route Tests ====================

    #[tokio::test]
    async fn test_health() {
        let response = app("teacher")
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_cors_preflight_is_answered_with_empty_body() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/create-user")
            .header("origin", "https://school.example.com")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "authorization, content-type")
            .body(Body::empty())
            .unwrap();

        let response = app("teacher").oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_plain_options_request_succeeds() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/create-user")
            .body(Body::empty())
            .unwrap();

        let response = app("teacher").oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_user_without_token() {
        let response = app("teacher")
            .oneshot(create_user_request(None, provision_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "Unauthorized" })
        );
    }

    #[tokio::test]
    async fn test_create_user_as_student_is_forbidden() {
        let response = app("student")
            .oneshot(create_user_request(Some("valid-token"), provision_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "Only teachers can create users"
        );
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let response = app("teacher")
            .oneshot(create_user_request(Some("valid-token"), provision_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["user"]["id"], "new-user");
        assert_eq!(
            body["resetLink"],
            "https://auth.example.com/verify?token=t&type=recovery"
        );
        assert_eq!(body["message"], "User created successfully");
    }

    #[tokio::test]
    async fn test_create_user_malformed_body() {
        let response = app("teacher")
            .oneshot(create_user_request(
                Some("valid-token"),
                serde_json::json!({ "email": "missing-fields@example.com" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_body_without_token_is_unauthorized() {
        let response = app("teacher")
            .oneshot(raw_create_user_request(None, "{\"email\": 42,"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "Unauthorized" })
        );
    }

    #[tokio::test]
    async fn test_malformed_body_from_student_is_forbidden() {
        let response = app("student")
            .oneshot(raw_create_user_request(Some("valid-token"), "not json"))
            .await
            .unwrap();

        assert_eq!(
            json_body(response).await["error"],
            "Only teachers can create users"
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_sync_endpoint_returns_record_and_storage_form() {
        let request = Request::builder()
            .method("POST")
            .uri("/testimonials/sync")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "text": { "fr": "Merci beaucoup" },
                    "author_name": { "fr": "Luc" },
                    "city": { "fr": "Nantes" },
                    "state": { "fr": "" },
                    "source_language": "fr"
                })
                .to_string(),
            ))
            .unwrap();

        let response = app("teacher").oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["record"]["text"]["en"], "MERCI BEAUCOUP");
        assert_eq!(body["record"]["text"]["fr"], "Merci beaucoup");
        assert_eq!(body["record"]["city"]["pt"], "Nantes");
        assert_eq!(body["record"]["active"], true);

        let stored_text: serde_json::Value =
            serde_json::from_str(body["stored"]["text"].as_str().unwrap()).unwrap();
        assert_eq!(stored_text["pt"], "MERCI BEAUCOUP");
    }

    #[tokio::test]
    async fn test_translation_metrics_route() {
        let response = app("teacher")
            .oneshot(
                Request::builder()
                    .uri("/translation/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(json_body(response).await["api_calls"].is_number());
    }
}
