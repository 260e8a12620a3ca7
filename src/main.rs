use clap::Parser;
use figment::providers::Env;
use figment::Figment;
use spoonful::app::App;
use spoonful::cli::Args;
use spoonful::config::Config;
use spoonful::logging::setup_logging;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config before App::new() so startup logs are never silently dropped
    let config: Config = match Figment::new().merge(Env::raw()).extract() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
        "starting spoonful"
    );

    let app = match App::new(config).await {
        Ok(app) => app,
        Err(e) => {
            error!(error = ?e, "failed to initialize application");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = app.run().await {
        error!(error = ?e, "server exited with error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
