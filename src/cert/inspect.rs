// src/cert/inspect.rs
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use x509_parser::pem::Pem;
use x509_parser::prelude::{FromDer, ParsedExtension, X509Certificate};

use crate::error::InspectError;

const EXPIRY_WARNING_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct CertificateInfo {
    pub subject: String,
    pub issuer: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub serial: String,
    pub fingerprint: String,
    pub is_ca: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CertificateStatus {
    Expired,
    ExpiringSoon,
    Valid,
}

impl CertificateInfo {
    pub fn status(&self, now: DateTime<Utc>) -> CertificateStatus {
        if self.not_after < now {
            CertificateStatus::Expired
        } else if self.not_after - now < Duration::days(EXPIRY_WARNING_DAYS) {
            CertificateStatus::ExpiringSoon
        } else {
            CertificateStatus::Valid
        }
    }
}

/// Parses every CERTIFICATE block in `pem`, in order. Other block types
/// (keys, CSRs) are skipped.
pub fn inspect_pem(pem: &str) -> Result<Vec<CertificateInfo>, InspectError> {
    let mut certificates = Vec::new();

    for block in Pem::iter_from_buffer(pem.as_bytes()) {
        let block = block.map_err(|e| InspectError::Pem(e.to_string()))?;
        if block.label != "CERTIFICATE" {
            continue;
        }
        certificates.push(analyze_der(&block.contents)?);
    }

    Ok(certificates)
}

fn analyze_der(der: &[u8]) -> Result<CertificateInfo, InspectError> {
    let (_remainder, cert) =
        X509Certificate::from_der(der).map_err(|e| InspectError::Certificate(e.to_string()))?;

    let not_before = Utc
        .timestamp_opt(cert.validity().not_before.timestamp(), 0)
        .single()
        .ok_or(InspectError::Timestamp("not_before"))?;
    let not_after = Utc
        .timestamp_opt(cert.validity().not_after.timestamp(), 0)
        .single()
        .ok_or(InspectError::Timestamp("not_after"))?;

    let is_ca = cert
        .extensions()
        .iter()
        .find_map(|ext| match ext.parsed_extension() {
            ParsedExtension::BasicConstraints(bc) => Some(bc.ca),
            _ => None,
        })
        .unwrap_or(false);

    Ok(CertificateInfo {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        not_before,
        not_after,
        serial: hex::encode(cert.raw_serial()),
        fingerprint: hex::encode(openssl::hash::hash(
            openssl::hash::MessageDigest::sha256(),
            der,
        )?),
        is_ca,
    })
}
