use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "testops-copilot",
    about = "Generate test cases from OpenAPI specifications and plain-text requirements",
    version
)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP backend
    Serve {
        /// Address to bind
        #[clap(long, value_name = "HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[clap(short, long, value_name = "PORT", default_value_t = 8000)]
        port: u16,
    },

    /// Generate test scenarios and code from a specification file
    Generate {
        /// Path to the OpenAPI specification file (.json, .yaml or .yml)
        #[clap(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Write the generated test code here instead of stdout
        #[clap(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write the normalized endpoint list as JSON
        #[clap(long, value_name = "FILE")]
        parsed_output: Option<PathBuf>,

        /// Print detailed scenarios (steps and expected results)
        #[clap(long)]
        detailed: bool,
    },
}
