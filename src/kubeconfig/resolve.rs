// src/kubeconfig/resolve.rs
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use super::document::KubeconfigDocument;
use crate::bundle::KubeAccess;
use crate::error::KubeconfigError;

/// How base64 encoded credential fields are decoded.
///
/// Name resolution is best-effort in every mode: a dangling context, cluster
/// or user reference leaves the matching fields empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Undecodable fields become empty strings
    #[default]
    Lenient,
    /// Undecodable fields fail the kubeconfig entry
    Strict,
}

impl KubeAccess {
    /// Builds Kubernetes access material from raw `kube.yml` bytes.
    ///
    /// Resolution follows `current-context` to its context, then the
    /// context's cluster and user. Every lookup takes the first entry with a
    /// matching name. A lookup that finds nothing is not an error; the
    /// fields it would have filled stay empty.
    pub fn from_kubeconfig(raw: &[u8], mode: DecodeMode) -> Result<Self, KubeconfigError> {
        let doc = KubeconfigDocument::from_slice(raw)?;

        let mut access = KubeAccess {
            config: String::from_utf8_lossy(raw).into_owned(),
            ..KubeAccess::default()
        };

        let (cluster_name, user_name) = match doc.context(&doc.current_context) {
            Some(ctx) => (ctx.cluster.as_str(), ctx.user.as_str()),
            None => {
                tracing::debug!(
                    current_context = %doc.current_context,
                    "kubeconfig current-context matches no context"
                );
                return Ok(access);
            }
        };

        match doc.cluster(cluster_name) {
            Some(cluster) => {
                access.host = cluster.server.clone();
                access.ca_certificate = decode_field(
                    "certificate-authority-data",
                    &cluster.certificate_authority_data,
                    mode,
                )?;
            }
            None => tracing::debug!(cluster = cluster_name, "kubeconfig cluster not found"),
        }

        match doc.user(user_name) {
            Some(user) => {
                access.client_key = decode_field("client-key-data", &user.client_key_data, mode)?;
                access.client_certificate = decode_field(
                    "client-certificate-data",
                    &user.client_certificate_data,
                    mode,
                )?;
            }
            None => tracing::debug!(user = user_name, "kubeconfig user not found"),
        }

        Ok(access)
    }
}

// Line breaks inside the encoded value are ignored.
fn decode_field(
    field: &'static str,
    encoded: &str,
    mode: DecodeMode,
) -> Result<String, KubeconfigError> {
    let compact: String = encoded
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect();

    let decoded = match general_purpose::STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            return match mode {
                DecodeMode::Lenient => {
                    tracing::debug!(field, "discarding undecodable kubeconfig field");
                    Ok(String::new())
                }
                DecodeMode::Strict => Err(KubeconfigError::Base64 {
                    field,
                    reason: e.to_string(),
                }),
            };
        }
    };

    match mode {
        DecodeMode::Lenient => Ok(String::from_utf8_lossy(&decoded).into_owned()),
        DecodeMode::Strict => String::from_utf8(decoded).map_err(|e| KubeconfigError::Base64 {
            field,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kubeconfig(current: &str, ca_data: &str) -> String {
        format!(
            r#"apiVersion: v1
kind: Config
preferences: {{}}
current-context: "{current}"
contexts:
- name: ctxA
  context:
    cluster: c1
    user: u1
clusters:
- name: c1
  cluster:
    server: "https://example:6443"
    certificate-authority-data: "{ca_data}"
users:
- name: u1
  user:
    client-certificate-data: "Qg=="
    client-key-data: "Qw=="
"#
        )
    }

    #[test]
    fn resolves_current_context() {
        let raw = kubeconfig("ctxA", "QQ==");
        let access = KubeAccess::from_kubeconfig(raw.as_bytes(), DecodeMode::Lenient).unwrap();

        assert_eq!(access.host, "https://example:6443");
        assert_eq!(access.ca_certificate, "A");
        assert_eq!(access.client_certificate, "B");
        assert_eq!(access.client_key, "C");
        assert!(!access.insecure);
        assert_eq!(access.config, raw);
    }

    #[test]
    fn dangling_current_context_leaves_fields_empty() {
        let raw = kubeconfig("nope", "QQ==");
        let access = KubeAccess::from_kubeconfig(raw.as_bytes(), DecodeMode::Lenient).unwrap();

        assert_eq!(access.host, "");
        assert_eq!(access.ca_certificate, "");
        assert_eq!(access.client_certificate, "");
        assert_eq!(access.client_key, "");
    }

    #[test]
    fn dangling_user_keeps_cluster_fields() {
        let raw = r#"
current-context: ctx
contexts:
- name: ctx
  context: {cluster: c1, user: ghost}
clusters:
- name: c1
  cluster: {server: "https://example:6443", certificate-authority-data: "QQ=="}
users:
- name: u1
  user: {client-certificate-data: "Qg==", client-key-data: "Qw=="}
"#;
        let access = KubeAccess::from_kubeconfig(raw.as_bytes(), DecodeMode::Strict).unwrap();

        assert_eq!(access.host, "https://example:6443");
        assert_eq!(access.ca_certificate, "A");
        assert_eq!(access.client_certificate, "");
        assert_eq!(access.client_key, "");
    }

    #[test]
    fn malformed_ca_data_is_empty_when_lenient() {
        let raw = kubeconfig("ctxA", "not base64!!");
        let access = KubeAccess::from_kubeconfig(raw.as_bytes(), DecodeMode::Lenient).unwrap();

        assert_eq!(access.ca_certificate, "");
        assert_eq!(access.host, "https://example:6443");
        assert_eq!(access.client_key, "C");
    }

    #[test]
    fn malformed_ca_data_fails_when_strict() {
        let raw = kubeconfig("ctxA", "not base64!!");
        let err = KubeAccess::from_kubeconfig(raw.as_bytes(), DecodeMode::Strict).unwrap_err();

        assert!(matches!(
            err,
            KubeconfigError::Base64 {
                field: "certificate-authority-data",
                ..
            }
        ));
    }

    #[test]
    fn wrapped_base64_is_decoded() {
        assert_eq!(
            decode_field("f", "SGVs\nbG8=\r\n", DecodeMode::Strict).unwrap(),
            "Hello"
        );
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let err =
            KubeAccess::from_kubeconfig(b"contexts: {name: [", DecodeMode::Lenient).unwrap_err();
        assert!(matches!(err, KubeconfigError::Parse(_)));
    }

    #[test]
    fn unknown_top_level_key_is_a_parse_error() {
        let raw = b"bogus-top: 1\ncurrent-context: x\n";
        let err = KubeAccess::from_kubeconfig(raw, DecodeMode::Lenient).unwrap_err();
        assert!(matches!(err, KubeconfigError::Parse(_)));
    }

    #[test]
    fn null_document_resolves_to_empty_access() {
        let access = KubeAccess::from_kubeconfig(b"null\n", DecodeMode::Strict).unwrap();
        assert_eq!(access.host, "");
        assert_eq!(access.config, "null\n");
    }
}
