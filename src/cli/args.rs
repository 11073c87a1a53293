// Mon Oct 19 2026 - Alex

use crate::memory::Address;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "layout-inspector")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Decode relocatable cista containers from a memory image", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Raw memory image to inspect
    #[arg(short, long, global = true)]
    pub image: Option<PathBuf>,

    /// Address the first byte of the image is mapped at
    #[arg(short, long, global = true)]
    pub base: Option<Address>,

    /// JSON type catalog describing the image's types
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[arg(long, global = true)]
    pub json: bool,

    /// Also write the rendered tree as JSON to this file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the value at an address as a tree
    Print(PrintArgs),
    /// Evaluate an accessor such as size, at or find
    Call(CallArgs),
    /// List registered printers and methods
    Printers,
}

#[derive(Parser, Debug)]
pub struct PrintArgs {
    #[arg(short = 't', long = "type")]
    pub type_name: String,

    #[arg(short, long)]
    pub address: Address,

    #[arg(long)]
    pub max_depth: Option<usize>,

    #[arg(long)]
    pub max_children: Option<usize>,

    /// List set bits instead of printing every bit
    #[arg(long)]
    pub sparse: bool,

    /// Show string content past the first NUL
    #[arg(long)]
    pub keep_nul: bool,

    #[arg(long)]
    pub addresses: bool,
}

#[derive(Parser, Debug)]
pub struct CallArgs {
    #[arg(short = 't', long = "type")]
    pub type_name: String,

    #[arg(short, long)]
    pub address: Address,

    #[arg(short, long)]
    pub method: String,

    #[arg(long)]
    pub arg: Option<String>,
}

impl CallArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.method.trim().is_empty() {
            return Err("Method name must not be empty".to_string());
        }
        Ok(())
    }
}
