//! A small inference server that maps free-text case descriptions to a
//! predicted category.
//!
//! Three artifacts exported by an offline training pipeline are loaded once at
//! startup: a classifier, a vectorizer and a label encoder. Each request is
//! normalized, vectorized, classified and decoded back into a label.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use case_classifier::{server, ArtifactPaths, Readiness};
//!
//! let readiness = Arc::new(Readiness::load(&ArtifactPaths::in_dir("models")));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! server::serve(listener, readiness, server::shutdown_signal()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Stub artifacts
//!
//! The request path only sees the [`Vectorizer`], [`Classifier`] and
//! [`LabelDecoder`] traits, so any implementation can be bundled into
//! [`Artifacts`]:
//!
//! ```rust
//! use std::sync::Arc;
//! use case_classifier::{Artifacts, LabelEncoder, Readiness};
//! # use case_classifier::{ArtifactError, Classifier, Vectorizer};
//! # use ndarray::Array2;
//! # #[derive(Debug)] struct Ones;
//! # impl Vectorizer for Ones {
//! #     fn transform(&self, d: &[&str]) -> Result<Array2<f64>, ArtifactError> { Ok(Array2::ones((d.len(), 1))) }
//! #     fn n_features(&self) -> usize { 1 }
//! # }
//! # #[derive(Debug)] struct AlwaysFirst;
//! # impl Classifier for AlwaysFirst {
//! #     fn predict(&self, x: &Array2<f64>) -> Result<Vec<i64>, ArtifactError> { Ok(vec![0; x.nrows()]) }
//! #     fn n_features(&self) -> usize { 1 }
//! #     fn classes(&self) -> &[i64] { &[0] }
//! # }
//!
//! let encoder = LabelEncoder::new(vec!["Civil".to_string()]).unwrap();
//! let readiness = Readiness::Ready(Artifacts::new(
//!     Arc::new(AlwaysFirst),
//!     Arc::new(Ones),
//!     Arc::new(encoder),
//! ));
//! assert_eq!(readiness.predict("Lease dispute").unwrap().prediction, "Civil");
//! ```

pub mod artifacts;
pub mod config;
pub mod loader;
mod normalize;
pub mod server;
pub mod service;

pub use artifacts::{
    ArtifactError, Artifacts, Classifier, ClassifierModel, LabelDecoder, LabelEncoder, TextVectorizer, Vectorizer,
};
pub use config::{Args, ServerConfig};
pub use loader::{load_artifacts, ArtifactPaths};
pub use normalize::normalize;
pub use service::{HealthStatus, PredictError, Prediction, Readiness};

/// Initializes logging with `default_filter` as the filter when `RUST_LOG` is unset.
pub fn init_logger(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}
