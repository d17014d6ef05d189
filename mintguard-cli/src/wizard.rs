//! Interactive guard document builder: `mintguard wizard`.
//!
//! Each guard is collected through a [`GuardInputBuilder`], which yields an
//! immutable raw input only once every answer for that guard is in and the
//! encoder accepts it.

use std::io::{self, BufRead, Stderr, StdinLock, Write};

use anyhow::{bail, Result};
use mintguard_core::assemble::assemble;
use mintguard_core::document::{GuardDocument, RawGroup, RawGuardInput};
use mintguard_core::error::GuardError;
use mintguard_core::guards::GuardKind;
use mintguard_core::registry::{self, GuardFieldSpec};

use crate::parse::parse_field_value;
use crate::serialize::MAX_LABEL_LENGTH;

const MAX_ATTEMPTS: usize = 3;

/// Line-oriented question/answer channel.
pub trait Prompter {
    /// Ask a question. Returns `None` at end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn say(&mut self, line: &str) -> io::Result<()>;
}

/// Prompter over any reader/writer pair; stdin/stderr in the binary.
pub struct StdioPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl StdioPrompter<StdinLock<'static>, Stderr> {
    /// Prompts go to stderr; stdout carries only the finished document.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }
}

/// Accumulates answers for one guard instance.
#[derive(Debug, Clone)]
pub struct GuardInputBuilder {
    kind: GuardKind,
    raw: RawGuardInput,
}

impl GuardInputBuilder {
    pub fn new(kind: GuardKind) -> Self {
        Self {
            kind,
            raw: RawGuardInput::new(),
        }
    }

    /// Record an answer. A blank answer leaves the field unset.
    pub fn answer(mut self, field: &GuardFieldSpec, text: &str) -> Self {
        if !text.is_empty() {
            self.raw.insert(field.name.to_string(), parse_field_value(text, field));
        }
        self
    }

    /// Validate against the encoder and release the raw input.
    pub fn build(self) -> Result<RawGuardInput, GuardError> {
        registry::encode(self.kind.as_str(), &self.raw)?;
        Ok(self.raw)
    }
}

/// Parse a comma-separated list of guard names or 1-based catalog numbers.
/// Repeats are dropped, first mention wins.
pub fn parse_kind_selection(text: &str) -> Result<Vec<GuardKind>, String> {
    let mut kinds = Vec::new();
    for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let kind = match part.parse::<usize>() {
            Ok(n) => n
                .checked_sub(1)
                .and_then(|i| GuardKind::ALL.get(i).copied())
                .ok_or_else(|| format!("no guard number {}", n))?,
            Err(_) => GuardKind::parse(part).ok_or_else(|| format!("unknown guard kind '{}'", part))?,
        };
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

fn ask_required<P: Prompter>(prompter: &mut P, prompt: &str) -> Result<String> {
    match prompter.ask(prompt)? {
        Some(answer) => Ok(answer),
        None => bail!("input ended before the wizard finished"),
    }
}

fn select_kinds<P: Prompter>(prompter: &mut P, prompt: &str) -> Result<Vec<GuardKind>> {
    loop {
        let answer = ask_required(prompter, prompt)?;
        match parse_kind_selection(&answer) {
            Ok(kinds) => return Ok(kinds),
            Err(e) => prompter.say(&format!("❌ {}", e))?,
        }
    }
}

/// Collect one guard's fields, re-asking the whole guard if the encoder
/// rejects the answers.
pub fn collect_guard<P: Prompter>(prompter: &mut P, kind: GuardKind) -> Result<RawGuardInput> {
    for _ in 0..MAX_ATTEMPTS {
        prompter.say(&format!("📋 {}", kind))?;
        let mut builder = GuardInputBuilder::new(kind);
        for field in kind.fields() {
            let optional = if field.required { "" } else { ", optional" };
            let prompt = format!("  {} ({}{}): ", field.name, field.semantic_type.hint(), optional);
            loop {
                let answer = ask_required(prompter, &prompt)?;
                if answer.is_empty() && field.required {
                    prompter.say(&format!("  {} is required", field.name))?;
                    continue;
                }
                builder = builder.answer(field, &answer);
                break;
            }
        }
        match builder.build() {
            Ok(raw) => return Ok(raw),
            Err(e) => prompter.say(&format!("❌ {}", e))?,
        }
    }
    bail!("giving up on guard '{}' after {} attempts", kind, MAX_ATTEMPTS)
}

/// Write a finished document as pretty JSON followed by a newline.
pub fn write_document<W: Write>(document: &GuardDocument, out: &mut W) -> Result<()> {
    writeln!(out, "{}", document.to_json_pretty()?)?;
    out.flush()?;
    Ok(())
}

/// Run the whole wizard and return a document that assembles cleanly.
pub fn run_wizard<P: Prompter>(prompter: &mut P) -> Result<GuardDocument> {
    prompter.say("🛡️  Guard wizard")?;
    for (i, kind) in GuardKind::ALL.iter().enumerate() {
        prompter.say(&format!("  {:>2}. {}", i + 1, kind))?;
    }

    let mut document = GuardDocument::default();
    let globals = select_kinds(
        prompter,
        "Global guards (names or numbers, comma-separated; blank for none): ",
    )?;
    for kind in globals {
        let raw = collect_guard(prompter, kind)?;
        document = document.with_guard(kind.as_str(), raw);
    }

    loop {
        let label = match prompter.ask("Group label (blank to finish): ")? {
            Some(label) if !label.is_empty() => label,
            _ => break,
        };
        if document.groups.iter().any(|g| g.label == label) {
            prompter.say(&format!("❌ group '{}' already exists", label))?;
            continue;
        }
        if label.len() > MAX_LABEL_LENGTH {
            prompter.say(&format!("❌ labels are at most {} bytes", MAX_LABEL_LENGTH))?;
            continue;
        }
        let kinds = select_kinds(prompter, &format!("Guards for '{}': ", label))?;
        let mut group = RawGroup::new(label);
        for kind in kinds {
            let raw = collect_guard(prompter, kind)?;
            group = group.with_guard(kind.as_str(), raw);
        }
        document = document.with_group(group);
    }

    assemble(&document)?;
    Ok(document)
}
