use chrono::Local;
use clap::Parser;
use hammer::args::common::HammerArgs;
use hammer::configs::config_provider::{ConfigProvider, FileConfigProvider};
use hammer::configs::run::RunConfig;
use hammer::error::HammerError;
use hammer::output::time_series_log::TimeSeriesLog;
use hammer::runner::{RunCoordinator, RunOutcome};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

#[tokio::main]
async fn main() -> Result<(), HammerError> {
    let args = HammerArgs::parse();

    Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("INFO")))
        .init();

    if args.print_settings_template {
        println!("{}", toml::to_string_pretty(&RunConfig::default())?);
        return Ok(());
    }
    let Some(settings_path) = args.settings.as_deref() else {
        return Err(HammerError::CannotLoadConfiguration(
            "Settings file path is required.".to_owned(),
        ));
    };

    let mut config = FileConfigProvider::new(settings_path).load_config().await?;
    let started_at = Local::now();
    config.resolve_names(
        settings_path,
        &started_at.format("%Y-%m-%dT%H-%M-%S").to_string(),
    );
    if let Some(output_path) = &args.output_path {
        config.output_path = Some(output_path.to_string_lossy().into_owned());
    }
    let output_path = PathBuf::from(config.output_path.clone().unwrap_or_default());

    let session_factory = args.target().create_session_factory()?;
    info!(
        "Run '{}' against {}, writing to '{}'",
        config.run_name(),
        session_factory.describe(),
        output_path.display()
    );

    let mut log = TimeSeriesLog::create(&output_path).await?;
    log.write_preamble(
        &started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        &toml::to_string_pretty(&config)?,
    )
    .await?;

    let target = config.inserts;
    let coordinator = RunCoordinator::new(config, session_factory);
    coordinator.run_setup().await?;
    let RunOutcome { report, mut log } = coordinator.run(log).await?;

    if let Err(error) = coordinator.collect_diagnostics(&mut log).await {
        warn!("Cannot collect diagnostics: {error}");
    }

    if let Some(json_path) = &args.json_report {
        report.dump_to_json(json_path)?;
        info!("Report saved to '{}'", json_path.display());
    }

    if !report.completed {
        return Err(HammerError::RunIncomplete {
            target,
            completed: report.summary.inserts,
        });
    }
    info!("Run finished, log saved to '{}'", output_path.display());
    Ok(())
}
