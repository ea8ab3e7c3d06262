use std::collections::HashSet;

use serde::Deserialize;

use super::error::ArtifactError;
use super::LabelDecoder;

/// Maps class ids back to category names. Id `i` decodes to `classes[i]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawLabelEncoder")]
pub struct LabelEncoder {
    classes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RawLabelEncoder {
    LabelEncoder { classes: Vec<String> },
}

impl TryFrom<RawLabelEncoder> for LabelEncoder {
    type Error = ArtifactError;

    fn try_from(raw: RawLabelEncoder) -> Result<Self, Self::Error> {
        let RawLabelEncoder::LabelEncoder { classes } = raw;
        Self::new(classes)
    }
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, ArtifactError> {
        if classes.is_empty() {
            return Err(ArtifactError::invalid("label encoder", "no classes"));
        }
        let mut seen = HashSet::new();
        for label in &classes {
            if !seen.insert(label.as_str()) {
                return Err(ArtifactError::invalid(
                    "label encoder",
                    format!("class {:?} appears more than once", label),
                ));
            }
        }
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl LabelDecoder for LabelEncoder {
    fn inverse_transform(&self, ids: &[i64]) -> Result<Vec<String>, ArtifactError> {
        ids.iter()
            .map(|&id| {
                usize::try_from(id)
                    .ok()
                    .and_then(|idx| self.classes.get(idx))
                    .cloned()
                    .ok_or(ArtifactError::UnseenLabel(id))
            })
            .collect()
    }

    fn n_classes(&self) -> usize {
        self.classes.len()
    }
}
