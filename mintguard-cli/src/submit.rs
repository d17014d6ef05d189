//! Compile pipeline and hand-off to the transaction builder.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mintguard_core::assemble::{assemble, CompiledConfiguration, TypedGuardSet};
use mintguard_core::document::GuardDocument;
use mintguard_core::registry;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::serialize::serialize_configuration;

/// Receives a compiled configuration and its serialized guard data.
///
/// Building, signing and sending the actual transaction happens behind this
/// trait; the compile pipeline never touches the network.
#[allow(async_fn_in_trait)]
pub trait TransactionBuilder {
    /// Returns a short human-readable receipt.
    async fn submit(&self, config: &CompiledConfiguration, guard_data: &[u8]) -> Result<String>;
}

/// Where [`HexFileBuilder`] writes the hex-encoded guard data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HexOutput {
    File(PathBuf),
    #[default]
    Stdout,
    Stderr,
}

impl HexOutput {
    /// Pick the destination for CLI flags. Under `--json` stdout carries only
    /// the JSON preview, so bare hex goes to stderr.
    pub fn for_cli(out: Option<PathBuf>, json: bool) -> Self {
        match out {
            Some(path) => HexOutput::File(path),
            None if json => HexOutput::Stderr,
            None => HexOutput::Stdout,
        }
    }
}

/// Writes the guard data as hex to a file, stdout or stderr.
#[derive(Debug, Clone, Default)]
pub struct HexFileBuilder {
    pub out: HexOutput,
}

impl TransactionBuilder for HexFileBuilder {
    async fn submit(&self, _config: &CompiledConfiguration, guard_data: &[u8]) -> Result<String> {
        let encoded = hex::encode(guard_data);
        match &self.out {
            HexOutput::File(path) => {
                tokio::fs::write(path, format!("{}\n", encoded))
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                Ok(format!("wrote {} bytes of guard data to {}", guard_data.len(), path.display()))
            }
            HexOutput::Stdout => {
                println!("{}", encoded);
                Ok(format!("printed {} bytes of guard data", guard_data.len()))
            }
            HexOutput::Stderr => {
                eprintln!("{}", encoded);
                Ok(format!("printed {} bytes of guard data to stderr", guard_data.len()))
            }
        }
    }
}

/// Read and parse a guard document from disk.
pub async fn load_document(path: &Path) -> Result<GuardDocument> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read guard document {}", path.display()))?;
    let document = GuardDocument::from_json(&text)
        .with_context(|| format!("failed to parse guard document {}", path.display()))?;
    debug!(path = %path.display(), "loaded guard document");
    Ok(document)
}

/// Log fields the catalog does not know. They are ignored by the encoder.
pub fn warn_unknown_fields(document: &GuardDocument) {
    let scopes = std::iter::once(("global guards".to_string(), &document.guard_config)).chain(
        document
            .groups
            .iter()
            .map(|g| (format!("group '{}'", g.label), &g.guards)),
    );
    for (scope, guards) in scopes {
        for (kind, fields) in object_entries(guards) {
            if let Ok(unknown) = registry::unknown_fields(kind, fields) {
                for field in unknown {
                    warn!(scope = %scope, kind = %kind, field = %field, "ignoring unknown guard field");
                }
            }
        }
    }
}

fn object_entries(guards: &Map<String, Value>) -> impl Iterator<Item = (&str, &Map<String, Value>)> {
    guards
        .iter()
        .filter_map(|(kind, value)| value.as_object().map(|fields| (kind.as_str(), fields)))
}

/// Print a compiled configuration in the human preview format.
pub fn print_preview(config: &CompiledConfiguration) {
    println!("🛡️  Global guards:");
    print_guard_set(&config.guards);
    for group in &config.groups {
        println!();
        println!("👥 Group '{}':", group.label);
        print_guard_set(&group.guards);
    }
    println!();
}

fn print_guard_set(set: &TypedGuardSet) {
    if set.is_empty() {
        println!("  (none)");
        return;
    }
    for guard in set.iter() {
        let kind = guard.kind();
        println!("  {} {{", kind);
        for (spec, value) in kind.fields().iter().zip(guard.field_values()) {
            println!("    {}: {},", spec.name, value);
        }
        println!("  }}");
    }
}

/// Compile a document: assemble, preview, serialize, optionally hand off.
pub async fn compile_document<B: TransactionBuilder>(
    document: &GuardDocument,
    builder: &B,
    dry_run: bool,
    json: bool,
) -> Result<CompiledConfiguration> {
    warn_unknown_fields(document);
    let config = assemble(document).context("guard configuration is invalid")?;
    let guard_data = serialize_configuration(&config).context("failed to serialize guard data")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print_preview(&config);
        println!(
            "🔧 Guard data: {} bytes, {} group(s), global mask {:#018x}",
            guard_data.len(),
            config.groups.len(),
            config.guards.feature_mask()
        );
    }

    if dry_run {
        if !json {
            println!("⚠️  Dry run — omit --dry-run to hand off the guard data.");
        }
        return Ok(config);
    }

    let receipt = builder.submit(&config, &guard_data).await?;
    info!(%receipt, "guard data handed off");
    if !json {
        println!("✅ {}", receipt);
    }
    Ok(config)
}
