//! Shoplist CLI Module
//! Command-line interface for serving the API and inspecting its rules

pub mod formatter;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::engine::rbac::Role;

#[derive(Parser, Debug)]
#[command(name = "shoplist")]
#[command(version)]
#[command(about = "Shared shopping list REST backend", long_about = None)]
pub struct Cli {
    /// Project directory holding shoplist.config.json (defaults to current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Output format (json for scripting)
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the REST API server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Show each role and the roles it implies
    Roles,

    /// Check whether one role satisfies another
    Check {
        /// Role the caller holds
        actual: Role,

        /// Role the operation requires
        required: Role,
    },

    /// Validate a JSON object against a named DTO-in schema
    Validate {
        /// DTO name, e.g. register or addMember
        dto: String,

        /// JSON object to validate
        json: String,

        /// Apply the query-string rules (presence and enum only)
        #[arg(long)]
        query: bool,
    },
}

impl Cli {
    pub fn get_project_dir(&self) -> PathBuf {
        self.project
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}
