// src/cert/mod.rs
mod inspect;

pub use inspect::{inspect_pem, CertificateInfo, CertificateStatus};
