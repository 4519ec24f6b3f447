// src/main.rs
mod types;

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use tracing::{error, warn};

use mke_clientbundle::bundle::{ClientBundle, ClientBundleDecoder, Decoded};
use mke_clientbundle::cert::{inspect_pem, CertificateInfo, CertificateStatus};
use mke_clientbundle::config::{DecoderConfig, OutputFormat};
use mke_clientbundle::utils::logging::init_logging;
use types::{Args, Command};

#[derive(Serialize)]
struct CertificateReport {
    #[serde(flatten)]
    info: CertificateInfo,
    status: CertificateStatus,
}

#[derive(Serialize)]
struct InspectReport {
    ca: Vec<CertificateReport>,
    certificates: Vec<CertificateReport>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = DecoderConfig::load(args.config.as_deref())?;
    args.apply_to_config(&mut config);

    init_logging(args.debug, config.log_path().as_deref())
        .context("failed to initialise logging")?;

    let decoder = ClientBundleDecoder::new(config.decode_mode);

    match &args.command {
        Command::Decode { bundles } => decode(&decoder, &config, bundles),
        Command::Kube { bundle } => kube(&decoder, &config, bundle),
        Command::Inspect { bundles } => inspect(&decoder, &config, bundles),
    }
}

fn decode(
    decoder: &ClientBundleDecoder,
    config: &DecoderConfig,
    patterns: &[String],
) -> anyhow::Result<()> {
    let paths = expand_patterns(patterns)?;
    let mut output = BTreeMap::new();
    let mut failed = 0;

    for path in &paths {
        let bundle_name = path.display().to_string();
        let decoded = match decode_file(decoder, path) {
            Ok(decoded) => decoded,
            Err(e) => {
                error!(bundle = %bundle_name, "{:#}", e);
                failed += 1;
                continue;
            }
        };

        let (bundle, incomplete) = decoded.into_parts();
        if let Some(err) = incomplete {
            error!(bundle = %bundle_name, "{}", err);
            failed += 1;
        } else if config.require_kube {
            if let Err(err) = bundle.require_kube() {
                error!(bundle = %bundle_name, "{}", err);
                failed += 1;
            }
        }
        output.insert(bundle_name, bundle.attributes());
    }

    if !output.is_empty() {
        println!("{}", render(&output, config.output_format)?);
    }

    if failed > 0 {
        bail!("{} of {} client bundles could not be fully decoded", failed, paths.len());
    }
    Ok(())
}

fn kube(decoder: &ClientBundleDecoder, config: &DecoderConfig, path: &str) -> anyhow::Result<()> {
    let path = PathBuf::from(shellexpand::tilde(path).to_string());
    let (bundle, incomplete) = decode_file(decoder, &path)?.into_parts();
    if let Some(err) = incomplete {
        warn!(bundle = %path.display(), "{}", err);
    }

    let kube = bundle
        .require_kube()
        .with_context(|| path.display().to_string())?;
    println!("{}", render(&kube.provider_config(), config.output_format)?);
    Ok(())
}

fn inspect(
    decoder: &ClientBundleDecoder,
    config: &DecoderConfig,
    patterns: &[String],
) -> anyhow::Result<()> {
    let paths = expand_patterns(patterns)?;
    let (output, failed) = inspect_files(decoder, &paths, Utc::now());

    if !output.is_empty() {
        println!("{}", render(&output, config.output_format)?);
    }

    if failed > 0 {
        bail!("{} of {} client bundles could not be inspected", failed, paths.len());
    }
    Ok(())
}

/// Inspects each bundle in turn; a bundle that cannot be opened or inspected
/// is logged and counted, and the rest are still reported.
fn inspect_files(
    decoder: &ClientBundleDecoder,
    paths: &[PathBuf],
    now: chrono::DateTime<Utc>,
) -> (BTreeMap<String, InspectReport>, usize) {
    let mut output = BTreeMap::new();
    let mut failed = 0;

    for path in paths {
        let bundle_name = path.display().to_string();
        let (bundle, incomplete) = match decode_file(decoder, path) {
            Ok(decoded) => decoded.into_parts(),
            Err(e) => {
                error!(bundle = %bundle_name, "{:#}", e);
                failed += 1;
                continue;
            }
        };
        if let Some(err) = incomplete {
            warn!(bundle = %bundle_name, "{}", err);
        }

        match inspect_bundle(&bundle, now) {
            Ok(report) => {
                output.insert(bundle_name, report);
            }
            Err(e) => {
                error!(bundle = %bundle_name, "failed to inspect: {:#}", e);
                failed += 1;
            }
        }
    }

    (output, failed)
}

fn decode_file(decoder: &ClientBundleDecoder, path: &Path) -> anyhow::Result<Decoded> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    decoder
        .decode(&bytes, bytes.len() as u64)
        .with_context(|| format!("failed to open {}", path.display()))
}

fn inspect_bundle(
    bundle: &ClientBundle,
    now: chrono::DateTime<Utc>,
) -> anyhow::Result<InspectReport> {
    let report = |pem: &str| -> anyhow::Result<Vec<CertificateReport>> {
        Ok(inspect_pem(pem)?
            .into_iter()
            .map(|info| CertificateReport {
                status: info.status(now),
                info,
            })
            .collect())
    };

    let ca = match &bundle.ca_certificate {
        Some(pem) => report(pem)?,
        None => Vec::new(),
    };
    let mut certificates = Vec::new();
    for pem in &bundle.certificates {
        certificates.extend(report(pem)?);
    }

    Ok(InspectReport { ca, certificates })
}

/// Expands `~` and glob patterns. Plain paths pass through untouched so a
/// missing file is reported when it is read.
fn expand_patterns(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let expanded = shellexpand::tilde(pattern).to_string();
        if !expanded.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(expanded));
            continue;
        }

        let before = paths.len();
        for entry in glob::glob(&expanded).with_context(|| format!("bad pattern {}", pattern))? {
            paths.push(entry?);
        }
        if paths.len() == before {
            return Err(anyhow!("no client bundle matches {}", pattern));
        }
    }

    Ok(paths)
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}
