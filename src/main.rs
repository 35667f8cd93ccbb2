use clap::Parser;
use error_stack::ResultExt;
use indicatif::ProgressStyle;
use thiserror::Error;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

use order_total::application::order_aggregator::OrderAggregator;
use order_total::cli::args::{read_env_file, Cli};
use order_total::infrastructure::config::app_config::AppConfig;
use order_total::infrastructure::confirmation::StdinConfirmation;
use order_total::infrastructure::webdriver::fantoccini_session::FantocciniSession;
use order_total::prettyprint::prettyprint::PrettyFormatter;

const LOG_FILE: &str = "order_total.log";

#[derive(Debug, Error)]
enum AppError {
    #[error("Failed to set up logging")]
    Logging,
    #[error("Invalid configuration")]
    Config,
    #[error("Failed to start the browser")]
    Startup,
    #[error("Failed to compute the total spent")]
    Run,
}

#[tokio::main]
async fn main() -> error_stack::Result<(), AppError> {
    let cli = Cli::parse();
    setup_tracing(cli.log_level)?;

    let env_values = read_env_file(&cli.env_file);
    let Some(credentials) = cli.credentials(&env_values) else {
        println!("Please provide email and password for login.");
        return Ok(());
    };

    let config = AppConfig::load(&cli.config).change_context(AppError::Config)?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let session = FantocciniSession::start(&config.webdriver)
        .await
        .change_context(AppError::Startup)?;

    let total = OrderAggregator::new(session, config.site)
        .compute_total_spent(&credentials, &StdinConfirmation::default())
        .await
        .change_context(AppError::Run)?;

    println!("Total spent money: {}", total);
    Ok(())
}

fn setup_tracing(level: tracing::Level) -> error_stack::Result<(), AppError> {
    let spinner_style =
        ProgressStyle::with_template("{span_child_prefix}{spinner:.cyan} {span_name} [{elapsed}]")
            .change_context(AppError::Logging)?;
    let indicatif_layer = IndicatifLayer::new().with_progress_style(spinner_style);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(true))
        .with_writer(indicatif_layer.get_stderr_writer());

    let log_file = std::fs::File::create(LOG_FILE)
        .change_context(AppError::Logging)
        .attach_printable_lazy(|| format!("Log file: {}", LOG_FILE))?;
    let log_file_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(false))
        .with_writer(log_file)
        .with_ansi(false);

    Registry::default()
        .with(tracing_subscriber::filter::Targets::new().with_target("order_total", level))
        .with(indicatif_layer)
        .with(log_file_layer)
        .with(stderr_layer)
        .try_init()
        .change_context(AppError::Logging)
}
