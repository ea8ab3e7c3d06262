//! HTTP surface: `POST /predict` and `GET /health`.
//!
//! ```bash
//! curl -X POST http://localhost:5000/predict \
//!      -H 'Content-Type: application/json' \
//!      -d '{"description": "Wire transfer to vendor"}'
//! # {"description":"Wire transfer to vendor","prediction":"Payments"}
//!
//! curl http://localhost:5000/health
//! # {"status":"ok"}
//! ```

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, warn};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;

use crate::service::{HealthStatus, PredictError, Prediction, Readiness};

/// Body of `POST /predict`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PredictRequest {
    /// The submitted value, kept as sent so it can be echoed back. `None`
    /// when the field is absent; `null` and other scalars are kept as is.
    #[serde(default, deserialize_with = "present_scalar")]
    pub description: Option<Value>,
}

fn present_scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Array(_) | Value::Object(_) => {
            Err(de::Error::custom("description must be a string"))
        }
        scalar => Ok(Some(scalar)),
    }
}

impl PredictRequest {
    /// Text handed to the classifier. A missing field is the empty string,
    /// `null` reads as `None` and other scalars use their JSON text.
    pub fn text(&self) -> String {
        match &self.description {
            None => String::new(),
            Some(Value::Null) => "None".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Value echoed in the response.
    pub fn echo(&self) -> Value {
        self.description
            .clone()
            .unwrap_or_else(|| Value::String(String::new()))
    }
}

/// Body of a successful `POST /predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub description: Value,
    pub prediction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
}

/// JSON envelope for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error("{0}")]
    InvalidRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Predict(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Request failed with {}: {}", status, self);
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

async fn predict(
    State(readiness): State<Arc<Readiness>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload?;
    let text = request.text();
    debug!("POST /predict ({} chars)", text.chars().count());
    let Prediction { prediction, .. } = readiness.predict(&text)?;
    Ok(Json(PredictResponse {
        description: request.echo(),
        prediction,
    }))
}

async fn health(State(readiness): State<Arc<Readiness>>) -> Json<HealthResponse> {
    debug!("GET /health");
    Json(HealthResponse {
        status: readiness.health(),
    })
}

/// Routes bound to an already loaded [`Readiness`].
pub fn router(readiness: Arc<Readiness>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(readiness)
}

/// Serves requests on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, readiness: Arc<Readiness>, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(readiness))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Shutdown signal received"),
        Err(e) => {
            log::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_coercion() {
        let parse = |v: Value| serde_json::from_value::<PredictRequest>(v).map(|r| (r.text(), r.echo()));
        assert_eq!(parse(json!({})).unwrap(), (String::new(), json!("")));
        assert_eq!(parse(json!({"description": null})).unwrap(), ("None".to_string(), Value::Null));
        assert_eq!(
            parse(json!({"description": "Court hearing"})).unwrap(),
            ("Court hearing".to_string(), json!("Court hearing"))
        );
        assert_eq!(parse(json!({"description": 42})).unwrap(), ("42".to_string(), json!(42)));
        assert_eq!(parse(json!({"description": true})).unwrap(), ("true".to_string(), json!(true)));
        assert!(parse(json!({"description": ["a"]})).is_err());
        assert!(parse(json!({"description": {"a": 1}})).is_err());
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ApiError::from(PredictError::NotReady).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::InvalidRequest("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_health_handler() {
        let Json(body) = health(State(Arc::new(Readiness::NotReady))).await;
        assert_eq!(body.status, HealthStatus::ModelNotLoaded);
    }
}
