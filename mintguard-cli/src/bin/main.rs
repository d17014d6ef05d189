use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use mintguard_core::guards::GuardKind;
use mintguard_core::registry::{self, catalog};
use mintguard_cli::cli::{parse_guard_args, print_catalog, print_guard_help, Cli, Commands};
use mintguard_cli::parse::raw_from_flags;
use mintguard_cli::submit::{compile_document, load_document, HexFileBuilder, HexOutput};
use mintguard_cli::wizard::{run_wizard, write_document, StdioPrompter};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn lookup_kind(kind: &str) -> Result<GuardKind> {
    Ok(kind.parse::<GuardKind>()?)
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Guards => {
            if cli.json {
                let entries: Vec<_> = catalog()
                    .iter()
                    .map(|def| serde_json::json!({ "kind": def.kind, "fields": def.fields }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_catalog();
            }
        }
        Commands::Describe { kind } => {
            let kind = lookup_kind(&kind)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(kind.fields())?);
            } else {
                print_guard_help(kind);
            }
        }
        Commands::Encode { kind, args } => {
            let kind = lookup_kind(&kind)?;
            let flags = parse_guard_args(&args);
            if flags.contains_key("help") {
                print_guard_help(kind);
                return Ok(());
            }
            let (raw, unknown) = raw_from_flags(kind, &flags);
            for flag in &unknown {
                warn!(kind = %kind, flag = %flag, "ignoring unknown flag");
            }
            let guard = registry::encode(kind.as_str(), &raw)?;
            if cli.json {
                let mut wrapped = serde_json::Map::new();
                wrapped.insert(kind.as_str().to_string(), serde_json::to_value(&guard)?);
                println!("{}", serde_json::to_string_pretty(&wrapped)?);
            } else {
                println!("📋 {} {{", kind);
                for (spec, value) in kind.fields().iter().zip(guard.field_values()) {
                    println!("  {}: {},", spec.name, value);
                }
                println!("}}");
            }
        }
        Commands::Compile { document, dry_run, out } => {
            let doc = load_document(&document).await?;
            let builder = HexFileBuilder {
                out: HexOutput::for_cli(out, cli.json),
            };
            compile_document(&doc, &builder, dry_run, cli.json).await?;
        }
        Commands::Wizard { out } => {
            let mut prompter = StdioPrompter::stdio();
            let document = run_wizard(&mut prompter)?;
            match out {
                Some(path) => {
                    if path.exists() {
                        bail!("{} already exists", path.display());
                    }
                    let mut buf = Vec::new();
                    write_document(&document, &mut buf)?;
                    tokio::fs::write(&path, buf)
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("✅ Guard document written to {}", path.display());
                }
                None => write_document(&document, &mut std::io::stdout().lock())?,
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = registry::verify_catalog() {
        eprintln!("❌ Guard catalog is inconsistent: {}", e);
        process::exit(2);
    }

    if let Err(e) = run(cli).await {
        eprintln!("❌ {:#}", e);
        process::exit(1);
    }
}
