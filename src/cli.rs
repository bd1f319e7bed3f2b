//! Command-line interface for FlashAI
//!
//! Provides argument parsing and subcommand handling for the `flashai` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate study flashcards from free-form text
#[derive(Parser)]
#[command(name = "flashai")]
#[command(version)]
#[command(about = "Generate study flashcards from free-form text")]
#[command(
    long_about = "FlashAI turns study text into question/answer flashcards using an \
    OpenAI-compatible language model, with bounded input, a hard provider timeout, \
    and strict validation of the model's output."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate flashcards from a text file and browse them in the terminal
    Study {
        /// File containing the study material
        file: PathBuf,

        /// Server root URL (overrides client.server_url)
        #[arg(short, long)]
        server: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# FlashAI Configuration
# ======================

# ─────────────────────────────────────────────────────────────────────────────
# SERVER
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "127.0.0.1"
port = 3000

# ─────────────────────────────────────────────────────────────────────────────
# PROVIDER
# ─────────────────────────────────────────────────────────────────────────────
#
# Any OpenAI-compatible chat-completions API. The credential is read from the
# environment variable named by api_key_env; the server will not start without it.

[provider]
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"
temperature = 0.3
max_tokens = 800
# Hard budget for one provider call (milliseconds)
timeout_ms = 15000

# ─────────────────────────────────────────────────────────────────────────────
# INPUT LIMITS (characters)
# ─────────────────────────────────────────────────────────────────────────────

[limits]
# Shorter input is rejected before any provider call
min_chars = 50
# Longer input is silently truncated
max_chars = 8000

# ─────────────────────────────────────────────────────────────────────────────
# STUDY CLIENT
# ─────────────────────────────────────────────────────────────────────────────

[client]
server_url = "http://127.0.0.1:3000"
# Submissions closer together than this are ignored
debounce_ms = 800
# Client-side round-trip budget, independent of the server's
timeout_ms = 15000

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"
"#
}
