//! Error types for client bundle decoding

use std::fmt;
use std::io;

use thiserror::Error;

/// The archive itself could not be opened. Fatal to the whole decode.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Bad magic, bad end-of-central-directory record, truncated directory
    #[error("client bundle archive is malformed: {0}")]
    Format(#[from] zip::result::ZipError),

    /// Fewer bytes were supplied than the declared content length
    #[error("client bundle archive is truncated: declared {declared} bytes, got {actual}")]
    LengthMismatch { declared: u64, actual: usize },
}

/// Failure to turn a kubeconfig document into Kubernetes access material
#[derive(Debug, Error)]
pub enum KubeconfigError {
    #[error("failed to parse kubeconfig: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Only produced in strict decode mode
    #[error("kubeconfig field {field} is not valid base64 text: {reason}")]
    Base64 { field: &'static str, reason: String },
}

/// What went wrong with a single archive entry
#[derive(Debug, Error)]
pub enum EntryErrorKind {
    #[error("failed to read material: {0}")]
    MaterialRead(#[source] io::Error),

    #[error(transparent)]
    ConfigParse(#[from] KubeconfigError),
}

/// A recognised archive entry that could not be extracted
#[derive(Debug, Error)]
#[error("{entry}: {kind}")]
pub struct EntryError {
    pub entry: String,
    #[source]
    pub kind: EntryErrorKind,
}

impl EntryError {
    pub fn material_read(entry: impl Into<String>, source: io::Error) -> Self {
        Self {
            entry: entry.into(),
            kind: EntryErrorKind::MaterialRead(source),
        }
    }

    pub fn config_parse(entry: impl Into<String>, source: KubeconfigError) -> Self {
        Self {
            entry: entry.into(),
            kind: EntryErrorKind::ConfigParse(source),
        }
    }
}

/// Aggregate of every entry failure seen during one decode.
///
/// Returned alongside a partially populated bundle: the bundle is incomplete,
/// not void.
#[derive(Debug)]
pub struct IncompleteBundleError {
    errors: Vec<EntryError>,
}

impl IncompleteBundleError {
    /// Returns `None` when there is nothing to report
    pub fn from_errors(errors: Vec<EntryError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[EntryError] {
        &self.errors
    }

    pub fn failed_entries(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.entry.as_str())
    }
}

impl fmt::Display for IncompleteBundleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to retrieve the client bundle: ")?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for IncompleteBundleError {}

/// Kubernetes access was required but the bundle carries no kubeconfig
#[derive(Debug, Error)]
#[error("client bundle produced no kube configuration. Is it a kube cluster?")]
pub struct NoKubernetesAccessError;

/// Certificate inspection errors
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("invalid PEM block: {0}")]
    Pem(String),

    #[error("invalid certificate: {0}")]
    Certificate(String),

    #[error("failed to fingerprint certificate: {0}")]
    Digest(#[from] openssl::error::ErrorStack),

    #[error("certificate {0} timestamp is out of range")]
    Timestamp(&'static str),
}

/// Decoder settings file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
