mod cli;
mod ui;

use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use jobparse::application::JobApplication;
use jobparse::config::JobparseConfig;
use jobparse::Extractor;
use ui::ExtractionProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = JobparseConfig::load()?;

    match cli.command {
        Command::Extract {
            url,
            api_key,
            retries,
            model,
        } => {
            let api_key = api_key.unwrap_or_else(|| config.api_key.clone());
            let retries = retries.unwrap_or(config.max_retries);
            let mut extractor = Extractor::from_config(&config);
            if let Some(model) = model {
                extractor = extractor.with_model(model);
            }

            let progress = ExtractionProgress::start(&url);
            let extractor = extractor.with_observer(&progress);
            match extractor.extract(&url, &api_key, retries).await {
                Ok(record) => {
                    let application = JobApplication::from_extraction(record, url);
                    progress.succeed(&application)?;
                }
                Err(err) => {
                    progress.fail(&err);
                    bail!("extraction failed ({})", err.kind());
                }
            }
        }
        Command::Prompt { url, model } => {
            let extractor = Extractor::from_config(&config);
            let extractor = match model {
                Some(model) => extractor.with_model(model),
                None => extractor,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&extractor.request_for(&url))?
            );
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "jobparse=debug" } else { "error" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
