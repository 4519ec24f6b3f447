// bundle/assemble.rs
use std::io::Read;

use tracing::{debug, info, warn};

use super::archive::BundleArchive;
use super::material::read_material;
use super::types::{ClientBundle, KubeAccess};
use crate::error::{ArchiveError, EntryError, IncompleteBundleError};
use crate::kubeconfig::DecodeMode;

pub const FILENAME_CA_PEM: &str = "ca.pem";
pub const FILENAME_CERT_PEM: &str = "cert.pem";
pub const FILENAME_PRIVATE_KEY_PEM: &str = "key.pem";
pub const FILENAME_PUBLIC_KEY_PEM: &str = "cert.pub";
pub const FILENAME_KUBECONFIG: &str = "kube.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    CaCertificate,
    Certificate,
    PrivateKey,
    PublicKey,
    Kubeconfig,
}

impl EntryKind {
    // Exact, case sensitive match on the full entry path
    fn from_name(name: &str) -> Option<Self> {
        match name {
            FILENAME_CA_PEM => Some(Self::CaCertificate),
            FILENAME_CERT_PEM => Some(Self::Certificate),
            FILENAME_PRIVATE_KEY_PEM => Some(Self::PrivateKey),
            FILENAME_PUBLIC_KEY_PEM => Some(Self::PublicKey),
            FILENAME_KUBECONFIG => Some(Self::Kubeconfig),
            _ => None,
        }
    }
}

/// Outcome of decoding an archive that could be opened.
///
/// `incomplete` carries every entry failure. When it is set the bundle holds
/// whatever the other entries yielded.
#[derive(Debug)]
pub struct Decoded {
    pub bundle: ClientBundle,
    pub incomplete: Option<IncompleteBundleError>,
}

impl Decoded {
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_none()
    }

    pub fn into_parts(self) -> (ClientBundle, Option<IncompleteBundleError>) {
        (self.bundle, self.incomplete)
    }

    /// Discards partial bundles
    pub fn into_result(self) -> Result<ClientBundle, IncompleteBundleError> {
        match self.incomplete {
            Some(err) => Err(err),
            None => Ok(self.bundle),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClientBundleDecoder {
    mode: DecodeMode,
}

impl ClientBundleDecoder {
    pub fn new(mode: DecodeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Decodes a client bundle archive body of `declared_len` bytes.
    ///
    /// Only an archive that cannot be opened fails outright. A bad entry is
    /// recorded in [`Decoded::incomplete`] and the remaining entries are still
    /// extracted.
    pub fn decode(&self, bytes: &[u8], declared_len: u64) -> Result<Decoded, ArchiveError> {
        let mut archive = BundleArchive::open(bytes, declared_len)?;
        Ok(self.assemble(&mut archive))
    }

    pub fn assemble(&self, archive: &mut BundleArchive<'_>) -> Decoded {
        let mut bundle = ClientBundle {
            id: archive.comment().to_string(),
            ..ClientBundle::default()
        };
        let mut errors = Vec::new();

        for index in 0..archive.len() {
            let name = match archive.entry_name(index) {
                Some(name) => name.to_string(),
                None => continue,
            };

            let Some(kind) = EntryKind::from_name(&name) else {
                debug!(entry = %name, "skipping unrecognised bundle entry");
                continue;
            };

            debug!(entry = %name, ?kind, "extracting bundle entry");
            if let Err(err) = self.extract(archive, index, &name, kind, &mut bundle) {
                warn!(entry = %name, error = %err.kind, "failed to extract bundle entry");
                errors.push(err);
            }
        }

        info!(
            id = %bundle.id,
            certificates = bundle.certificates.len(),
            kube = bundle.kube.is_some(),
            failed = errors.len(),
            "decoded client bundle"
        );

        Decoded {
            bundle,
            incomplete: IncompleteBundleError::from_errors(errors),
        }
    }

    fn extract(
        &self,
        archive: &mut BundleArchive<'_>,
        index: usize,
        name: &str,
        kind: EntryKind,
        bundle: &mut ClientBundle,
    ) -> Result<(), EntryError> {
        let reader = archive
            .open_entry(index)
            .map_err(|e| EntryError::material_read(name, e))?;

        match kind {
            EntryKind::CaCertificate => bundle.ca_certificate = Some(material(reader, name)?),
            EntryKind::Certificate => bundle.certificates.push(material(reader, name)?),
            EntryKind::PrivateKey => bundle.private_key = Some(material(reader, name)?),
            EntryKind::PublicKey => bundle.public_key = Some(material(reader, name)?),
            EntryKind::Kubeconfig => bundle.kube = Some(self.kubeconfig(reader, name)?),
        }
        Ok(())
    }

    fn kubeconfig(&self, mut reader: impl Read, name: &str) -> Result<KubeAccess, EntryError> {
        let mut raw = Vec::new();
        reader
            .read_to_end(&mut raw)
            .map_err(|e| EntryError::material_read(name, e))?;
        KubeAccess::from_kubeconfig(&raw, self.mode).map_err(|e| EntryError::config_parse(name, e))
    }
}

fn material(reader: impl Read, name: &str) -> Result<String, EntryError> {
    read_material(reader).map_err(|e| EntryError::material_read(name, e))
}

/// Decodes with the default lenient policy, trusting the slice length
pub fn decode_client_bundle(bytes: &[u8]) -> Result<Decoded, ArchiveError> {
    ClientBundleDecoder::default().decode(bytes, bytes.len() as u64)
}
