//! CLI argument definitions for the conftree binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect and edit YAML configuration trees
#[derive(Parser, Debug)]
#[command(name = "conftree")]
#[command(about = "Inspect and edit YAML configuration trees by path")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the value at a path
    Get(GetArgs),
    /// Write a scalar value at a path and save the file
    Set(SetArgs),
    /// Re-emit the whole file in canonical form
    Dump(DumpArgs),
}

/// Arguments for the get command
#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// YAML file to read
    #[arg(short, long, env = "CONFTREE_FILE")]
    pub file: PathBuf,

    /// Slash-delimited path, e.g. menu/page_size or switches/@0/name
    pub path: String,
}

/// Arguments for the set command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// YAML file to edit (created if missing)
    #[arg(short, long, env = "CONFTREE_FILE")]
    pub file: PathBuf,

    /// Slash-delimited path; directives like @next append
    pub path: String,

    /// Scalar value to write, stored verbatim
    #[arg(required_unless_present = "null")]
    pub value: Option<String>,

    /// Write null instead of a value, hiding the entry on save
    #[arg(long, conflicts_with = "value")]
    pub null: bool,
}

/// Arguments for the dump command
#[derive(clap::Args, Debug)]
pub struct DumpArgs {
    /// YAML file to read
    #[arg(short, long, env = "CONFTREE_FILE")]
    pub file: PathBuf,
}
