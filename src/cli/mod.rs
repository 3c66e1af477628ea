//! CLI module for SafeVault
//!
//! Provides command-line interface parsing for the safevault-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// SafeVault - Credential issuance & input-safety server
///
/// A user-management server that validates untrusted input, issues and
/// validates signed bearer tokens, and generates key material on demand.
#[derive(Parser, Debug)]
#[command(
    name = "safevault-server",
    version,
    about = "SafeVault - Credential issuance & input-safety server",
    long_about = "A user-management server that validates untrusted input, issues and validates\n\
                  signed bearer tokens with role claims, and generates key material on demand.\n\n\
                  Run without arguments to start the server.",
    after_help = "EXAMPLES:\n    \
                  safevault-server                        # Start the server (requires safevault.toml)\n    \
                  safevault-server --config my.toml       # Use a custom config file\n    \
                  safevault-server keygen hmac            # Print a fresh 256-bit signing key\n    \
                  safevault-server keygen rsa --bits 3072 # Print an RSA key pair\n    \
                  safevault-server config --validate      # Check the configuration"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "safevault.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Generate key material and print it
    ///
    /// The HMAC key can be used directly as the server's signing key.
    Keygen {
        /// Kind of key to generate
        #[arg(value_enum)]
        kind: KeyKind,

        /// Key size in bits (defaults: hmac 256, aes 256, rsa 2048)
        #[arg(short, long, allow_negative_numbers = true)]
        bits: Option<i64>,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// Key material kinds
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    Hmac,
    Aes,
    Rsa,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
