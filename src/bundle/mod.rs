// src/bundle/mod.rs
mod archive;
mod assemble;
mod material;
#[cfg(test)]
pub(crate) mod testutil;
mod types;

pub use archive::BundleArchive;
pub use assemble::{
    decode_client_bundle, ClientBundleDecoder, Decoded, FILENAME_CA_PEM, FILENAME_CERT_PEM,
    FILENAME_KUBECONFIG, FILENAME_PRIVATE_KEY_PEM, FILENAME_PUBLIC_KEY_PEM,
};
pub use material::read_material;
pub use types::{BundleAttributes, ClientBundle, KubeAccess, KubeAttributes, KubernetesProviderConfig};
