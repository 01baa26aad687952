//! Subreddit Harvester - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use subreddit_harvester::{
    api::{RedditApi, Session},
    cli::Args,
    collect::{run, RunSettings, RunSummary},
    config::{validate_config, Config},
    error::{exit_codes, Error, Result},
    output::{
        print_banner, print_config_summary, print_error, print_info, print_run_summary,
        print_source_report, print_success, print_warning, JsonSink,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run_cli().await {
        Ok(summary) if summary.sources_failed > 0 => {
            print_warning(&format!(
                "{} subreddit(s) failed",
                summary.sources_failed
            ));
            ExitCode::from(exit_codes::SOME_SOURCES_FAILED as u8)
        }
        Ok(_) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_)
                | Error::UrlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Output(_) | Error::Io(_) | Error::Json(_) => {
                    ExitCode::from(exit_codes::OUTPUT_ERROR as u8)
                }
                ref e if e.is_remote() => ExitCode::from(exit_codes::API_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run_cli() -> Result<RunSummary> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    validate_config(&config)?;
    let settings = RunSettings::from_config(&config)?;

    print_config_summary(
        &settings.subreddits,
        &settings.range.to_string(),
        settings.target,
        settings.comment_samples,
        &config.collection.output_directory.display().to_string(),
    );

    let session = Session::new(
        config.account.access_token.clone(),
        config.account.user_agent.clone(),
    );
    let api = RedditApi::new(&session, &config.endpoints, &config.limits)?;
    let sink = JsonSink::new(config.collection.output_directory.clone());

    let summary = run(&api, &sink, &settings).await?;

    for report in &summary.reports {
        print_source_report(report);
    }
    print_run_summary(&summary);

    if summary.total_records > 0 {
        print_success(&format!(
            "Collected {} posts into {}",
            summary.total_records,
            sink.directory().display()
        ));
    }

    Ok(summary)
}
