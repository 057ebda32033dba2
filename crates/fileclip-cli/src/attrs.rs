//! Attribute subcommands: each one opens a session on the target file,
//! performs a single operation through it, and prints the result.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;

use fileclip_core::{AttrEntry, AttrName, AttrSession};

/// One row of `list --json` output.
#[derive(Serialize)]
struct EntryRow<'a> {
    name: &'a str,
    text: bool,
    display: &'a str,
}

pub(crate) fn format_row(entry: &AttrEntry) -> String {
    format!("{}={}", entry.name(), entry.display_text())
}

fn open(path: &PathBuf) -> Result<AttrSession> {
    tracing::debug!(path = %path.display(), "opening session");
    AttrSession::open(path).with_context(|| format!("opening {}", path.display()))
}

#[derive(Args)]
pub struct ListArgs {
    /// Target file
    pub path: PathBuf,
    /// Emit a JSON array instead of name=value rows
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn run(&self) -> Result<()> {
        let session = open(&self.path)?;
        if self.json {
            let rows: Vec<EntryRow> = session
                .entries()
                .iter()
                .map(|e| EntryRow {
                    name: e.name().as_str(),
                    text: e.is_text(),
                    display: e.display_text(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            for entry in session.entries() {
                println!("{}", format_row(entry));
            }
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct GetArgs {
    /// Target file
    pub path: PathBuf,
    /// Attribute name (namespace-prefixed, e.g. user.comment)
    pub name: AttrName,
}

impl GetArgs {
    pub fn run(&self) -> Result<()> {
        let session = open(&self.path)?;
        let entry = session
            .entries()
            .iter()
            .find(|e| e.name() == &self.name)
            .with_context(|| format!("no attribute {} on {}", self.name, self.path.display()))?;
        std::io::stdout().write_all(entry.value())?;
        Ok(())
    }
}

#[derive(Args)]
pub struct SetArgs {
    /// Target file
    pub path: PathBuf,
    /// Attribute name (namespace-prefixed, e.g. user.comment)
    pub name: AttrName,
    /// New value
    pub value: String,
}

impl SetArgs {
    pub fn run(&self) -> Result<()> {
        if self.value.is_empty() {
            bail!("an empty value is a removal request; use `fclip remove`");
        }
        let mut session = open(&self.path)?;
        session
            .apply(&self.name, self.value.as_bytes())
            .with_context(|| format!("setting {}", self.name))?;
        Ok(())
    }
}

#[derive(Args)]
pub struct AddArgs {
    /// Target file
    pub path: PathBuf,
    /// Attribute name (namespace-prefixed, e.g. user.comment)
    pub name: AttrName,
}

impl AddArgs {
    pub fn run(&self) -> Result<()> {
        let mut session = open(&self.path)?;
        session
            .add_new(&self.name)
            .with_context(|| format!("adding {}", self.name))?;
        Ok(())
    }
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Target file
    pub path: PathBuf,
    /// Attribute name (namespace-prefixed, e.g. user.comment)
    pub name: AttrName,
}

impl RemoveArgs {
    pub fn run(&self) -> Result<()> {
        let mut session = open(&self.path)?;
        // Removal is an apply with an empty value, same as emptying a row.
        session
            .apply(&self.name, b"")
            .with_context(|| format!("removing {}", self.name))?;
        Ok(())
    }
}
