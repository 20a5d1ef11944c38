use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use planity_e2e::prelude::*;
use planity_e2e::StepStatus;
use tracing_subscriber::EnvFilter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

const SCENARIO: &str = "Recherche de coiffeurs";

#[derive(Parser)]
#[command(name = "planity-e2e")]
#[command(about = "Run the Planity end-to-end UI scenario", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the hairdresser search scenario
    Run {
        /// Configuration file (.properties or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target platform: Web, Android or iOS (overrides config)
        #[arg(short, long)]
        platform: Option<String>,

        /// Browser for Web runs: chrome, firefox or edge (overrides config)
        #[arg(short, long)]
        browser: Option<String>,

        /// City to search hairdressers in
        #[arg(long, default_value = "Paris")]
        city: String,
    },

    /// Validate a configuration file without starting a session
    Validate {
        /// Configuration file (default: first of the standard locations)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,
    },
}

#[cfg(feature = "otel")]
fn init_otel_tracing(verbose: bool) {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::runtime::Tokio;
    use opentelemetry_sdk::trace::TracerProvider;

    let filter = if verbose {
        "planity_e2e=debug"
    } else {
        "planity_e2e=info"
    };

    let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&otlp_endpoint)
        .build()
        .expect("Failed to create OTLP exporter");

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, Tokio)
        .build();

    let tracer = provider.tracer("planity-e2e");
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .init();

    opentelemetry::global::set_tracer_provider(provider);
}

#[cfg(not(feature = "otel"))]
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "planity_e2e=debug"
    } else {
        "planity_e2e=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    #[cfg(feature = "otel")]
    init_otel_tracing(cli.verbose);

    #[cfg(not(feature = "otel"))]
    init_tracing(cli.verbose);

    let result = run(cli).await;

    #[cfg(feature = "otel")]
    opentelemetry::global::shutdown_tracer_provider();

    match result {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Run {
            config,
            platform,
            browser,
            city,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(platform) = platform {
                config.platform_name = platform;
            }
            if let Some(browser) = browser {
                config.browser = browser;
            }
            run_scenario(config, &city).await
        }
        Commands::Validate { path } => validate(path),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SuiteConfig> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Configuration not found: {}", path.display());
            }
            ConfigLoader::load_file(path)?
        }
        None => ConfigLoader::load_default()?,
    };
    Ok(config.with_env_overrides())
}

async fn run_scenario(config: SuiteConfig, city: &str) -> anyhow::Result<bool> {
    let platform = config.platform()?;
    println!("Running '{}' on {} ({})", SCENARIO, platform, config.server_url(platform));

    let provider = Arc::new(DriverProvider::new(config));
    let mut runner = ScenarioRunner::new(provider.clone());

    if let Err(e) = runner.before(SCENARIO).await {
        runner.after(true).await;
        return Err(e.into());
    }

    let outcome = PlanitySteps::hairdresser_search(&mut runner, city).await;
    if let Err(e) = &outcome {
        eprintln!("✗ {}", e);
    }

    let report = runner.after(outcome.is_err()).await;
    if let Err(e) = provider.close_all().await {
        tracing::warn!("Session cleanup failed: {}", e);
    }

    let ledger = runner.ledger();
    println!();
    println!(
        "Steps: {} passed, {} failed",
        ledger.count(StepStatus::Passed),
        ledger.count(StepStatus::Failed)
    );
    if let Some(report) = report {
        println!("Report: {}", report.display());
    }

    let success = outcome.is_ok() && !ledger.has_failures();
    if success {
        println!("✓ {} passed", SCENARIO);
    } else {
        println!("✗ {} failed", SCENARIO);
    }
    Ok(success)
}

fn validate(path: Option<PathBuf>) -> anyhow::Result<bool> {
    let config = load_config(path.as_ref())?;
    let platform = config.platform()?;

    println!("Platform:   {}", platform);
    if platform == Platform::Web {
        let browser = config.browser().map_err(anyhow::Error::msg)?;
        println!("Browser:    {}", browser);
    }
    println!("Server URL: {}", config.server_url(platform));
    println!("Base URL:   {}", config.base_url);

    match path {
        Some(path) => println!("✓ {} is valid", path.display()),
        None => println!("✓ configuration is valid"),
    }
    Ok(true)
}
