// types.rs
use clap::{Parser, Subcommand};

use mke_clientbundle::config::{DecoderConfig, OutputFormat};
use mke_clientbundle::kubeconfig::DecodeMode;

/// Decode MKE client bundle archives into credential material
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Decoder settings file (JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Fail the kubeconfig entry on undecodable base64 instead of emptying the field
    #[arg(long)]
    pub strict: bool,

    /// Treat bundles without a kubeconfig as failures
    #[arg(long)]
    pub require_kube: bool,

    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the attributes of each bundle
    Decode {
        /// Bundle archive paths or glob patterns
        #[arg(required = true)]
        bundles: Vec<String>,
    },
    /// Print Kubernetes provider connection settings for one bundle
    Kube { bundle: String },
    /// Print certificate details for the CA and client certificates
    Inspect {
        #[arg(required = true)]
        bundles: Vec<String>,
    },
}

impl Args {
    /// Flags that were given override the settings file
    pub fn apply_to_config(&self, config: &mut DecoderConfig) {
        if self.strict {
            config.decode_mode = DecodeMode::Strict;
        }
        if self.require_kube {
            config.require_kube = true;
        }
        if let Some(format) = self.format {
            config.output_format = format;
        }
    }
}
