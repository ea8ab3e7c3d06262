use std::path::PathBuf;

use clap::Parser;

use crate::loader::{ArtifactPaths, DEFAULT_LABEL_ENCODER_FILE, DEFAULT_MODEL_FILE, DEFAULT_VECTORIZER_FILE};

/// Command line options. Every flag can also be set from the environment.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "CASE_CLASSIFIER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "CASE_CLASSIFIER_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Verbose logging, including every request
    #[arg(short, long, env = "CASE_CLASSIFIER_DEBUG")]
    pub debug: bool,

    /// Directory holding the artifact files
    #[arg(long, env = "CASE_CLASSIFIER_ARTIFACT_DIR", default_value = ".")]
    pub artifact_dir: PathBuf,

    /// Classifier artifact, relative to the artifact directory
    #[arg(long, env = "CASE_CLASSIFIER_MODEL_FILE", default_value = DEFAULT_MODEL_FILE)]
    pub model_file: PathBuf,

    /// Vectorizer artifact, relative to the artifact directory
    #[arg(long, env = "CASE_CLASSIFIER_VECTORIZER_FILE", default_value = DEFAULT_VECTORIZER_FILE)]
    pub vectorizer_file: PathBuf,

    /// Label encoder artifact, relative to the artifact directory
    #[arg(long, env = "CASE_CLASSIFIER_LABEL_ENCODER_FILE", default_value = DEFAULT_LABEL_ENCODER_FILE)]
    pub label_encoder_file: PathBuf,
}

/// Settings the server needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub artifacts: ArtifactPaths,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
            artifacts: ArtifactPaths::default(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default log filter, used when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        let dir = args.artifact_dir;
        Self {
            host: args.host,
            port: args.port,
            debug: args.debug,
            artifacts: ArtifactPaths {
                classifier: dir.join(args.model_file),
                vectorizer: dir.join(args.vectorizer_file),
                label_encoder: dir.join(args.label_encoder_file),
            },
        }
    }
}
