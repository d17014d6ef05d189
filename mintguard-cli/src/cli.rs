//! CLI surface: argument definitions, help text, string utilities.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mintguard_core::guards::GuardKind;
use mintguard_core::registry::{catalog, GuardFieldSpec};

#[derive(Parser, Debug)]
#[command(name = "mintguard", version, about = "Compile candy-guard configurations")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(short, long, global = true, help = "Log at debug level (overridden by RUST_LOG)")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every guard kind and its fields
    Guards,
    /// Show the fields of one guard kind
    Describe { kind: String },
    /// Encode a single guard from flags, e.g. `encode solPayment --lamports 1000 --destination <KEY>`
    Encode {
        kind: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Compile a guard document and hand it to the transaction builder
    Compile {
        #[arg(env = "MINTGUARD_DOCUMENT")]
        document: PathBuf,
        #[arg(long, help = "Print the compiled configuration without handing it off")]
        dry_run: bool,
        #[arg(long, env = "MINTGUARD_OUT", help = "Write serialized guard data here instead of stdout")]
        out: Option<PathBuf>,
    },
    /// Build a guard document interactively
    Wizard {
        #[arg(long, help = "Write the document here instead of stdout")]
        out: Option<PathBuf>,
    },
}

/// Print every guard kind with its flag summary.
pub fn print_catalog() {
    println!("🛡️  Guard kinds ({})", catalog().len());
    println!();
    for def in catalog() {
        let fields: Vec<String> = def.fields.iter().map(flag_summary).collect();
        println!("  {:<20} {}", def.kind, fields.join(" "));
    }
    println!();
    println!("FORMATS:");
    println!("  BASE58        32-byte public key");
    println!("  NUMBER        Non-negative integer; pass large values as strings");
    println!("  HEX           Hex bytes, optional 0x prefix");
    println!("  BASE58,...    Comma-separated public keys");
    println!("  UNIX|RFC3339  Unix seconds or a date like 2024-01-01T00:00:00Z");
    println!();
    println!("Optional fields are shown in [brackets].");
}

/// Print detailed help for a single guard kind.
pub fn print_guard_help(kind: GuardKind) {
    let fields = kind.fields();
    println!("📋 {} — {} field(s)", kind, fields.len());
    println!();
    for field in fields {
        let presence = if field.required { "required" } else { "optional" };
        println!(
            "  --{:<22} {} ({:?}, {}) — format: {}",
            camel_to_kebab(field.name),
            field.name,
            field.semantic_type,
            presence,
            field.semantic_type.hint()
        );
    }
}

fn flag_summary(field: &GuardFieldSpec) -> String {
    let flag = format!("--{} <{}>", camel_to_kebab(field.name), field.semantic_type.hint());
    if field.required {
        flag
    } else {
        format!("[{}]", flag)
    }
}

/// Parse `--key value` pairs into a map. A flag with no value is `true`.
pub fn parse_guard_args(args: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut i = 0;
    while i < args.len() {
        if let Some(key) = args[i].strip_prefix("--") {
            if i + 1 < args.len() && !args[i + 1].starts_with("--") {
                map.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                map.insert(key.to_string(), "true".to_string());
                i += 1;
            }
        } else {
            i += 1;
        }
    }
    map
}

// ─── String utilities ────────────────────────────────────────────

pub fn camel_to_kebab(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
