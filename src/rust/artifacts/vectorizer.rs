use std::collections::{HashMap, HashSet};

use ndarray::{Array1, Array2, Axis};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ArtifactError;
use super::utils::normalize_rows;
use super::Vectorizer;

const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Row normalization applied after term weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

#[derive(Debug, Clone)]
enum Weighting {
    Counts,
    Tfidf { idf: Array1<f64>, sublinear_tf: bool },
}

/// Bag-of-words vectorizer exported from a fitted count or TF-IDF model.
///
/// The JSON form is tagged by `kind`:
///
/// ```json
/// {
///   "kind": "tfidf",
///   "vocabulary": {"wire": 0, "transfer": 1},
///   "idf": [1.5, 1.2],
///   "ngram_range": [1, 2],
///   "norm": "l2"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawVectorizer")]
pub struct TextVectorizer {
    vocabulary: HashMap<String, usize>,
    n_features: usize,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    lowercase: bool,
    stop_words: Option<HashSet<String>>,
    weighting: Weighting,
    norm: Option<Norm>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RawVectorizer {
    Tfidf {
        #[serde(flatten)]
        common: RawCommon,
        idf: Vec<f64>,
        #[serde(default)]
        sublinear_tf: bool,
        #[serde(default = "default_tfidf_norm")]
        norm: Option<Norm>,
    },
    Count {
        #[serde(flatten)]
        common: RawCommon,
        #[serde(default)]
        norm: Option<Norm>,
    },
}

#[derive(Debug, Deserialize)]
struct RawCommon {
    vocabulary: HashMap<String, usize>,
    #[serde(default = "default_token_pattern")]
    token_pattern: String,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default)]
    stop_words: Option<HashSet<String>>,
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_lowercase() -> bool {
    true
}

fn default_tfidf_norm() -> Option<Norm> {
    Some(Norm::L2)
}

impl TryFrom<RawVectorizer> for TextVectorizer {
    type Error = ArtifactError;

    fn try_from(raw: RawVectorizer) -> Result<Self, Self::Error> {
        let (common, weighting, norm) = match raw {
            RawVectorizer::Tfidf { common, idf, sublinear_tf, norm } => (
                common,
                Weighting::Tfidf {
                    idf: Array1::from(idf),
                    sublinear_tf,
                },
                norm,
            ),
            RawVectorizer::Count { common, norm } => (common, Weighting::Counts, norm),
        };

        let n_features = common.vocabulary.len();
        if n_features == 0 {
            return Err(ArtifactError::invalid("vectorizer", "vocabulary is empty"));
        }
        let mut seen = vec![false; n_features];
        for (term, &column) in &common.vocabulary {
            if column >= n_features {
                return Err(ArtifactError::invalid(
                    "vectorizer",
                    format!("term {:?} maps to column {} but there are only {} features", term, column, n_features),
                ));
            }
            if std::mem::replace(&mut seen[column], true) {
                return Err(ArtifactError::invalid(
                    "vectorizer",
                    format!("column {} is assigned to more than one term", column),
                ));
            }
        }

        if let Weighting::Tfidf { idf, .. } = &weighting {
            if idf.len() != n_features {
                return Err(ArtifactError::invalid(
                    "vectorizer",
                    format!("idf has {} weights for {} features", idf.len(), n_features),
                ));
            }
        }

        let (min_n, max_n) = common.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::invalid(
                "vectorizer",
                format!("invalid ngram_range ({}, {})", min_n, max_n),
            ));
        }

        let token_pattern = Regex::new(&common.token_pattern)?;
        if token_pattern.captures_len() > 2 {
            return Err(ArtifactError::invalid(
                "vectorizer",
                "token_pattern may contain at most one capturing group",
            ));
        }

        Ok(Self {
            vocabulary: common.vocabulary,
            n_features,
            token_pattern,
            ngram_range: common.ngram_range,
            lowercase: common.lowercase,
            stop_words: common.stop_words,
            weighting,
            norm,
        })
    }
}

impl TextVectorizer {
    /// Splits a document into the terms looked up in the vocabulary.
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let document = if self.lowercase {
            document.to_lowercase()
        } else {
            document.to_string()
        };

        let mut tokens: Vec<String> = if self.token_pattern.captures_len() == 2 {
            self.token_pattern
                .captures_iter(&document)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .collect()
        } else {
            self.token_pattern
                .find_iter(&document)
                .map(|m| m.as_str().to_string())
                .collect()
        };

        if let Some(stop_words) = &self.stop_words {
            tokens.retain(|token| !stop_words.contains(token));
        }

        self.word_ngrams(tokens)
    }

    fn word_ngrams(&self, tokens: Vec<String>) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        if max_n == 1 {
            return tokens;
        }

        let mut terms = Vec::new();
        if min_n == 1 {
            terms.extend(tokens.iter().cloned());
        }
        let first = min_n.max(2);
        for n in first..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    fn weight(&self, counts: &mut Array2<f64>) {
        if let Weighting::Tfidf { idf, sublinear_tf } = &self.weighting {
            if *sublinear_tf {
                counts.mapv_inplace(|tf| if tf > 0.0 { 1.0 + tf.ln() } else { 0.0 });
            }
            for mut row in counts.axis_iter_mut(Axis(0)) {
                row *= idf;
            }
        }
        if let Some(norm) = self.norm {
            normalize_rows(counts, norm);
        }
    }
}

impl Vectorizer for TextVectorizer {
    fn transform(&self, documents: &[&str]) -> Result<Array2<f64>, ArtifactError> {
        if documents.is_empty() {
            return Err(ArtifactError::EmptyBatch);
        }

        let mut matrix = Array2::<f64>::zeros((documents.len(), self.n_features));
        for (row, document) in documents.iter().enumerate() {
            for term in self.analyze(document) {
                if let Some(&column) = self.vocabulary.get(&term) {
                    matrix[[row, column]] += 1.0;
                }
            }
        }

        self.weight(&mut matrix);
        Ok(matrix)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}
