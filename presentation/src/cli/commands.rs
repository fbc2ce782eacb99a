//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for llm-prism
#[derive(Parser, Debug, Default)]
#[command(name = "prism")]
#[command(author, version, about = "Send one prompt to many LLMs and keep every answer")]
#[command(long_about = r#"
llm-prism sends a single prompt to every selected model concurrently and
writes each answer to its own markdown file under a run directory.

Models are chosen with exactly one of:
  -m/--model <KEY>         a single model (provider:model_id)
  --models <KEY,KEY,...>   an explicit list, in order
  -g/--group <NAME>        every model in a configured group
  (nothing)                every enabled model

Configuration files are loaded from (in priority order):
1. PRISM_* environment variables
2. --config <path>                        Explicit config file
3. ./prism.toml or ./.prism.toml          Project-level config
4. ~/.config/llm-prism/config.toml        Global config

Example:
  prism "What's the best way to handle errors in Rust?"
  prism -g coding -c src/main.rs "Review this file"
  prism --models openai:gpt-4o,anthropic:claude-3-5-sonnet-latest --table "Define monad"
"#)]
pub struct Cli {
    /// The prompt to send (or use --prompt-file)
    pub prompt: Option<String>,

    /// Read the prompt from a file
    #[arg(long, value_name = "PATH", conflicts_with = "prompt")]
    pub prompt_file: Option<PathBuf>,

    /// Query a single model by config key (provider:model_id)
    #[arg(short, long, value_name = "KEY", conflicts_with_all = ["models", "group"])]
    pub model: Option<String>,

    /// Query an explicit, comma-separated list of models
    #[arg(long, value_name = "KEY,...", value_delimiter = ',', conflicts_with = "group")]
    pub models: Vec<String>,

    /// Query every model in a configured group
    #[arg(short, long, value_name = "NAME")]
    pub group: Option<String>,

    /// Append a file to the prompt (can be specified multiple times)
    #[arg(short, long, value_name = "PATH")]
    pub context: Vec<PathBuf>,

    /// Base directory for the run directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Name of the run directory (default: run-YYYYMMDD-HHMMSS)
    #[arg(long, value_name = "NAME")]
    pub run_name: Option<String>,

    /// System prompt for every model, overriding group prompts
    #[arg(long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Maximum number of provider calls in flight at once
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Per-call timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Leave the metadata section out of response files
    #[arg(long)]
    pub no_metadata: bool,

    /// Do not prefix grouped responses' filenames with the group name
    #[arg(long)]
    pub no_group_prefix: bool,

    /// Show responses as a table instead of sections
    #[arg(long)]
    pub table: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Stop with an error as soon as a response file cannot be written
    #[arg(long)]
    pub fail_fast: bool,

    /// List the models a provider offers and exit
    #[arg(long, value_name = "PROVIDER")]
    pub list_models: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
