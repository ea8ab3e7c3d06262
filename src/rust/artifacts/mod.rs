//! Inference halves of the three externally trained artifacts.
//!
//! The request path only depends on the [`Vectorizer`], [`Classifier`] and
//! [`LabelDecoder`] traits. The concrete types in this module read the JSON
//! documents exported by the training pipeline.

use std::fmt;
use std::sync::Arc;

use ndarray::Array2;

pub mod error;
pub mod label_encoder;
pub mod model;
pub(crate) mod utils;
pub mod vectorizer;

pub use error::ArtifactError;
pub use label_encoder::LabelEncoder;
pub use model::{ClassifierModel, LinearModel, NaiveBayesModel};
pub use vectorizer::{Norm, TextVectorizer};

/// Turns a batch of normalized documents into a `(batch, n_features)` matrix.
pub trait Vectorizer: fmt::Debug + Send + Sync {
    fn transform(&self, documents: &[&str]) -> Result<Array2<f64>, ArtifactError>;

    fn n_features(&self) -> usize;
}

/// Maps every row of a feature matrix to a class id.
pub trait Classifier: fmt::Debug + Send + Sync {
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<i64>, ArtifactError>;

    fn n_features(&self) -> usize;

    /// Every class id `predict` can return.
    fn classes(&self) -> &[i64];
}

/// Maps class ids back to human readable category names.
pub trait LabelDecoder: fmt::Debug + Send + Sync {
    fn inverse_transform(&self, ids: &[i64]) -> Result<Vec<String>, ArtifactError>;

    fn n_classes(&self) -> usize;
}

/// The three loaded artifacts. Immutable once built and cheap to clone.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub classifier: Arc<dyn Classifier>,
    pub vectorizer: Arc<dyn Vectorizer>,
    pub label_encoder: Arc<dyn LabelDecoder>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Artifacts>();
    }
};

impl Artifacts {
    /// Bundles the artifacts without checking that they fit together.
    pub fn new(
        classifier: Arc<dyn Classifier>,
        vectorizer: Arc<dyn Vectorizer>,
        label_encoder: Arc<dyn LabelDecoder>,
    ) -> Self {
        Self {
            classifier,
            vectorizer,
            label_encoder,
        }
    }

    /// Bundles the artifacts after checking that the vectorizer output fits the
    /// classifier input and that every class id can be decoded.
    pub fn validated(
        classifier: Arc<dyn Classifier>,
        vectorizer: Arc<dyn Vectorizer>,
        label_encoder: Arc<dyn LabelDecoder>,
    ) -> Result<Self, ArtifactError> {
        if vectorizer.n_features() != classifier.n_features() {
            return Err(ArtifactError::FeatureMismatch {
                expected: classifier.n_features(),
                actual: vectorizer.n_features(),
            });
        }
        let n_classes = label_encoder.n_classes();
        if let Some(&id) = classifier
            .classes()
            .iter()
            .find(|&&id| usize::try_from(id).map_or(true, |idx| idx >= n_classes))
        {
            return Err(ArtifactError::UnseenLabel(id));
        }
        Ok(Self::new(classifier, vectorizer, label_encoder))
    }
}
