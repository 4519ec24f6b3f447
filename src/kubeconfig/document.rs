// src/kubeconfig/document.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::error::KubeconfigError;

/// Shape of the `kube.yml` file shipped inside a client bundle.
///
/// Unknown top-level keys are rejected, unknown keys inside the entries are
/// tolerated. A value of the wrong type for a known key is rejected. Missing
/// or null keys fall back to empty values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KubeconfigDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferences: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clusters: Vec<NamedCluster>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contexts: Vec<NamedContext>,
    #[serde(
        rename = "current-context",
        default,
        deserialize_with = "null_as_default"
    )]
    pub current_context: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<NamedUser>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NamedCluster {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cluster: ClusterEntry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub certificate_authority_data: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub server: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NamedContext {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: ContextEntry,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContextEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cluster: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NamedUser {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: UserEntry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_certificate_data: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_key_data: String,
}

impl KubeconfigDocument {
    /// An empty or `null` document is an empty kubeconfig
    pub fn from_slice(raw: &[u8]) -> Result<Self, KubeconfigError> {
        let doc: Option<Self> = serde_yaml::from_slice(raw)?;
        Ok(doc.unwrap_or_default())
    }

    /// First context whose name matches wins; duplicates are not rejected
    pub fn context(&self, name: &str) -> Option<&ContextEntry> {
        self.contexts
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.context)
    }

    pub fn cluster(&self, name: &str) -> Option<&ClusterEntry> {
        self.clusters
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.cluster)
    }

    pub fn user(&self, name: &str) -> Option<&UserEntry> {
        self.users.iter().find(|u| u.name == name).map(|u| &u.user)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
