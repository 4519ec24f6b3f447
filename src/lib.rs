//! Decoder for MKE client bundle archives.
//!
//! A client bundle is a ZIP archive of PEM material plus a kubeconfig. This
//! crate turns one into a [`ClientBundle`], collecting per-entry failures
//! rather than stopping at the first one.

pub mod bundle;
pub mod cert;
pub mod config;
pub mod error;
pub mod kubeconfig;
pub mod utils;

pub use bundle::{decode_client_bundle, ClientBundle, ClientBundleDecoder, Decoded, KubeAccess};
pub use error::{ArchiveError, IncompleteBundleError, NoKubernetesAccessError};
pub use kubeconfig::DecodeMode;
