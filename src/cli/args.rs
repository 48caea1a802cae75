use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run conformance scenarios against a backend.
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    #[arg(long, env = "RLV_BACKEND_URL")]
    pub backend_url: String,

    #[arg(long, env = "RLV_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, env = "RLV_FIXTURES_DIR", default_value = "fixtures")]
    pub fixtures: PathBuf,

    #[arg(long, value_enum, default_value_t = Scenario::All)]
    pub scenario: Scenario,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Lifecycle,
    Import,
    All,
}
