// bundle/types.rs
use serde::Serialize;

use crate::error::NoKubernetesAccessError;

/// Credential material decoded from one client bundle archive.
///
/// Built fresh for every decode and never mutated after it is returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientBundle {
    /// Archive comment
    pub id: String,
    pub ca_certificate: Option<String>,
    /// Every `cert.pem` entry in archive order
    pub certificates: Vec<String>,
    pub private_key: Option<String>,
    pub public_key: Option<String>,
    /// Absent for bundles from clusters without Kubernetes
    pub kube: Option<KubeAccess>,
}

/// Kubernetes API access derived from the bundle's kubeconfig.
///
/// Credential fields hold decoded PEM text, never the base64 form found in
/// the kubeconfig.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KubeAccess {
    pub host: String,
    pub client_key: String,
    pub client_certificate: String,
    pub ca_certificate: String,
    pub insecure: bool,
    /// The kubeconfig document as shipped
    pub config: String,
}

/// Connection settings for a Kubernetes API client or provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KubernetesProviderConfig {
    pub host: String,
    pub client_key: String,
    pub client_certificate: String,
    pub cluster_ca_certificate: String,
    pub insecure: bool,
}

/// Flat attribute view of a bundle, as exposed by the client bundle resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleAttributes {
    pub id: String,
    pub private_key: String,
    pub public_key: String,
    pub ca_cert: String,
    pub client_certs: Vec<String>,
    /// Zero or one element
    pub kube: Vec<KubeAttributes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KubeAttributes {
    pub config_yml: String,
    pub host: String,
    pub client_key: String,
    pub client_cert: String,
    pub ca_cert: String,
}

impl ClientBundle {
    /// Kubernetes access, for consumers that cannot proceed without it
    pub fn require_kube(&self) -> Result<&KubeAccess, NoKubernetesAccessError> {
        self.kube.as_ref().ok_or(NoKubernetesAccessError)
    }

    /// True when no recognised entry was extracted
    pub fn is_empty(&self) -> bool {
        self.ca_certificate.is_none()
            && self.certificates.is_empty()
            && self.private_key.is_none()
            && self.public_key.is_none()
            && self.kube.is_none()
    }

    pub fn attributes(&self) -> BundleAttributes {
        BundleAttributes {
            id: self.id.clone(),
            private_key: self.private_key.clone().unwrap_or_default(),
            public_key: self.public_key.clone().unwrap_or_default(),
            ca_cert: self.ca_certificate.clone().unwrap_or_default(),
            client_certs: self.certificates.clone(),
            kube: self
                .kube
                .iter()
                .map(|k| KubeAttributes {
                    config_yml: k.config.clone(),
                    host: k.host.clone(),
                    client_key: k.client_key.clone(),
                    client_cert: k.client_certificate.clone(),
                    ca_cert: k.ca_certificate.clone(),
                })
                .collect(),
        }
    }
}

impl KubeAccess {
    pub fn provider_config(&self) -> KubernetesProviderConfig {
        KubernetesProviderConfig {
            host: self.host.clone(),
            client_key: self.client_key.clone(),
            client_certificate: self.client_certificate.clone(),
            cluster_ca_certificate: self.ca_certificate.clone(),
            insecure: self.insecure,
        }
    }
}
