// src/kubeconfig/mod.rs
mod document;
mod resolve;

pub use document::{
    ClusterEntry, ContextEntry, KubeconfigDocument, NamedCluster, NamedContext, NamedUser,
    UserEntry,
};
pub use resolve::DecodeMode;
