//! FileClip CLI library

pub mod attrs;

// Re-export CLI types for testing
pub use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fclip")]
#[command(about = "Edit the extended attributes of a single file")]
#[command(version, author, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a file's attributes
    List(attrs::ListArgs),
    /// Print one attribute's raw value
    Get(attrs::GetArgs),
    /// Set an attribute's value, creating it if absent
    Set(attrs::SetArgs),
    /// Add a new attribute seeded with the placeholder value
    Add(attrs::AddArgs),
    /// Remove an attribute
    Remove(attrs::RemoveArgs),
}
