mod cli;
mod output;

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use rlv::fixtures::DirFixtures;
use rlv::scenarios;
use rlv::{HttpBackend, LifecycleVerifier};

use cli::{Cli, Command, Scenario};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let backend = HttpBackend::new(args.backend_url.clone(), args.token.clone())?;
            let fixtures = DirFixtures::new(args.fixtures.clone());
            let verifier = LifecycleVerifier::new(Arc::new(backend), Arc::new(fixtures));

            if matches!(args.scenario, Scenario::Lifecycle | Scenario::All) {
                tracing::info!(backend_url = %args.backend_url, "running lifecycle scenario");
                let report = scenarios::import_rule_lifecycle(&verifier).await?;
                println!("{}", output::render_report("lifecycle", &report));
            }

            if matches!(args.scenario, Scenario::Import | Scenario::All) {
                tracing::info!(backend_url = %args.backend_url, "running import scenario");
                let report = scenarios::import_rule_import(&verifier).await?;
                println!("{}", output::render_report("import", &report));
            }
        }
    }

    Ok(())
}
