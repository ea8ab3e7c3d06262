use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::artifacts::{ArtifactError, Artifacts, ClassifierModel, LabelEncoder, TextVectorizer};

pub const DEFAULT_MODEL_FILE: &str = "best_model.json";
pub const DEFAULT_VECTORIZER_FILE: &str = "vectorizer.json";
pub const DEFAULT_LABEL_ENCODER_FILE: &str = "label_encoder.json";

/// Locations of the three artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub vectorizer: PathBuf,
    pub label_encoder: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

impl ArtifactPaths {
    /// The default file names resolved against `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            classifier: dir.join(DEFAULT_MODEL_FILE),
            vectorizer: dir.join(DEFAULT_VECTORIZER_FILE),
            label_encoder: dir.join(DEFAULT_LABEL_ENCODER_FILE),
        }
    }

    pub fn all_present(&self) -> bool {
        log::debug!("Checking artifact files:");
        log::debug!("  Classifier: {:?} (exists: {})", self.classifier, self.classifier.exists());
        log::debug!("  Vectorizer: {:?} (exists: {})", self.vectorizer, self.vectorizer.exists());
        log::debug!("  Label encoder: {:?} (exists: {})", self.label_encoder, self.label_encoder.exists());
        self.classifier.exists() && self.vectorizer.exists() && self.label_encoder.exists()
    }
}

/// SHA-256 of `bytes` as lowercase hex.
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn load_json<T: DeserializeOwned>(path: &Path, artifact: &str) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Read {} artifact from {:?} ({} bytes, sha256 {})", artifact, path, bytes.len(), digest(&bytes));
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads, parses and cross-checks the classifier, vectorizer and label encoder.
///
/// Either all three load or none do.
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<Artifacts, ArtifactError> {
    let classifier: ClassifierModel = load_json(&paths.classifier, "classifier")?;
    let vectorizer: TextVectorizer = load_json(&paths.vectorizer, "vectorizer")?;
    let label_encoder: LabelEncoder = load_json(&paths.label_encoder, "label encoder")?;
    log::info!("Label encoder knows {} categories: {:?}", label_encoder.classes().len(), label_encoder.classes());

    Artifacts::validated(Arc::new(classifier), Arc::new(vectorizer), Arc::new(label_encoder))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let paths = ArtifactPaths::in_dir("/srv/models");
        assert_eq!(paths.classifier, PathBuf::from("/srv/models/best_model.json"));
        assert_eq!(paths.vectorizer, PathBuf::from("/srv/models/vectorizer.json"));
        assert_eq!(paths.label_encoder, PathBuf::from("/srv/models/label_encoder.json"));
        assert_eq!(ArtifactPaths::default(), ArtifactPaths::in_dir("."));
    }

    #[test]
    fn test_digest() {
        assert_eq!(
            digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let paths = ArtifactPaths::in_dir("/nonexistent/case-classifier");
        assert!(!paths.all_present());
        assert!(matches!(load_artifacts(&paths), Err(ArtifactError::Io { .. })));
    }
}
