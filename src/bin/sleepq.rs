//! sleepq - command-line interface for the sleep quality service
//!
//! Commands:
//! - serve: Run the HTTP API
//! - predict: Predict from a survey JSON file (one-shot)
//! - encode: Show the feature row a survey encodes to
//! - doctor: Check that the model artifacts load and agree

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sleep_quality::artifacts::{load_network, load_scaler};
use sleep_quality::config::{ConfigError, ServiceConfig};
use sleep_quality::model::Classifier;
use sleep_quality::normalizer::Preprocessor;
use sleep_quality::types::{EncodingFlag, TimeOfDay};
use sleep_quality::{
    predict_sleep_quality, FeatureEncoder, PredictError, SleepPredictor, SurveyInput, SERVICE_NAME,
    SERVICE_VERSION,
};

/// sleepq - survey-based sleep quality prediction
#[derive(Parser)]
#[command(name = "sleepq")]
#[command(version = SERVICE_VERSION)]
#[command(about = "Predict sleep quality from social media survey answers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

/// Artifact locations; unset flags fall back to the environment
#[derive(clap::Args)]
struct ArtifactArgs {
    /// Scaler artifact (overrides SLEEPQ_SCALER_PATH)
    #[arg(long)]
    scaler: Option<PathBuf>,

    /// Network artifact (overrides SLEEPQ_MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Bind host (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,

        #[command(flatten)]
        artifacts: ArtifactArgs,
    },

    /// Predict from a survey JSON file
    Predict {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Pretty-print the prediction
        #[arg(long)]
        pretty: bool,
    },

    /// Show the feature row a survey encodes to
    Encode {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Order columns as this scaler expects
        #[arg(long)]
        scaler: Option<PathBuf>,
    },

    /// Check that the model artifacts load and agree
    Doctor {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    // Keep stdout clean for the JSON-producing commands
    let default_level = match cli.command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);

    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> Result<(), SleepqError> {
    match cli.command {
        Commands::Serve {
            host,
            port,
            artifacts,
        } => cmd_serve(host, port, artifacts),

        Commands::Predict {
            input,
            artifacts,
            pretty,
        } => cmd_predict(&input, artifacts, pretty),

        Commands::Encode { input, scaler } => cmd_encode(&input, scaler.as_deref()),

        Commands::Doctor { artifacts, json } => cmd_doctor(artifacts, json),
    }
}

fn resolve_config(artifacts: ArtifactArgs) -> Result<ServiceConfig, SleepqError> {
    let mut config = ServiceConfig::from_env()?;
    if let Some(scaler) = artifacts.scaler {
        config.artifacts.scaler = scaler;
    }
    if let Some(model) = artifacts.model {
        config.artifacts.model = model;
    }
    Ok(config)
}

fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    artifacts: ArtifactArgs,
) -> Result<(), SleepqError> {
    let mut config = resolve_config(artifacts)?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    tracing::info!("Starting {} {}", SERVICE_NAME, SERVICE_VERSION);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(sleep_quality::http::serve(&config))?;
    Ok(())
}

fn cmd_predict(input: &Path, artifacts: ArtifactArgs, pretty: bool) -> Result<(), SleepqError> {
    let config = resolve_config(artifacts)?;
    let input_data = read_input(input)?;

    let output = predict_sleep_quality(&input_data, &config.artifacts)?;
    if pretty {
        println!("{output}");
    } else {
        let value: serde_json::Value = serde_json::from_str(&output)?;
        println!("{value}");
    }
    Ok(())
}

fn cmd_encode(input: &Path, scaler: Option<&Path>) -> Result<(), SleepqError> {
    let survey = read_survey(input)?;
    let mut encoded = FeatureEncoder::encode(&survey);

    if let Some(scaler_path) = scaler {
        let scaler = load_scaler(scaler_path)?;
        encoded.features = encoded.features.select(scaler.feature_names())?;
    }

    let report = EncodeReport {
        columns: encoded
            .features
            .iter()
            .map(|(name, value)| EncodedColumn {
                name: name.to_string(),
                value,
            })
            .collect(),
        flags: encoded.flags,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_doctor(artifacts: ArtifactArgs, json: bool) -> Result<(), SleepqError> {
    let config = resolve_config(artifacts)?;
    let paths = &config.artifacts;
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck::ok(
        "service_version",
        format!("{} {}", SERVICE_NAME, SERVICE_VERSION),
    ));

    let scaler = match load_scaler(&paths.scaler) {
        Ok(scaler) => {
            checks.push(DoctorCheck::ok(
                "scaler",
                format!(
                    "{} loaded, {} features",
                    paths.scaler.display(),
                    scaler.feature_names().len()
                ),
            ));
            Some(scaler)
        }
        Err(e) => {
            checks.push(DoctorCheck::error("scaler", e.to_string()));
            None
        }
    };

    let network = match load_network(&paths.model) {
        Ok(network) => {
            checks.push(DoctorCheck::ok(
                "model",
                format!(
                    "{} loaded, {} inputs, {} layers",
                    paths.model.display(),
                    network.input_dim(),
                    network.layers.len()
                ),
            ));
            Some(network)
        }
        Err(e) => {
            checks.push(DoctorCheck::error("model", e.to_string()));
            None
        }
    };

    match (scaler, network) {
        (Some(scaler), Some(network)) => match SleepPredictor::new(scaler, network) {
            Ok(predictor) => {
                checks.push(DoctorCheck::ok(
                    "artifact_agreement",
                    "scaler columns are produced by the encoder and match the network width",
                ));
                checks.push(smoke_check(&predictor));
            }
            Err(e) => checks.push(DoctorCheck::error("artifact_agreement", e.to_string())),
        },
        _ => checks.push(DoctorCheck::warning(
            "artifact_agreement",
            "skipped, artifacts did not load",
        )),
    }

    let report = DoctorReport {
        service: SERVICE_NAME.to_string(),
        version: SERVICE_VERSION.to_string(),
        scaler_path: paths.scaler.display().to_string(),
        model_path: paths.model.display().to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("sleepq Doctor Report");
        println!("====================");
        println!("Service: {} {}", report.service, report.version);
        println!("Scaler:  {}", report.scaler_path);
        println!("Model:   {}", report.model_path);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(SleepqError::DoctorFailed)
    } else {
        Ok(())
    }
}

/// Run a fixed survey through the loaded artifacts
fn smoke_check(predictor: &SleepPredictor) -> DoctorCheck {
    let survey = SurveyInput {
        age: 20,
        time_of_day_pattern: TimeOfDay::Evening,
        sleep_delay_bucket: "Kurang dari 30 menit".to_string(),
        fomo_scores: vec![3; 10],
        app_duration_1: "1:00".to_string(),
        app_duration_2: "0:30".to_string(),
        app_duration_3: "0:15".to_string(),
    };

    match predictor.predict(&survey) {
        Ok(prediction) => DoctorCheck::ok(
            "smoke_prediction",
            format!(
                "reference survey -> {} ({}%)",
                prediction.result.category.as_str(),
                prediction.result.confidence_percent
            ),
        ),
        Err(e) => DoctorCheck::error("smoke_prediction", e.to_string()),
    }
}

fn read_input(input: &Path) -> Result<String, SleepqError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn read_survey(input: &Path) -> Result<SurveyInput, SleepqError> {
    Ok(SurveyInput::from_json(&read_input(input)?)?)
}

#[derive(Debug)]
enum SleepqError {
    Io(io::Error),
    Predict(PredictError),
    Json(serde_json::Error),
    Config(ConfigError),
    DoctorFailed,
}

impl From<io::Error> for SleepqError {
    fn from(e: io::Error) -> Self {
        SleepqError::Io(e)
    }
}

impl From<PredictError> for SleepqError {
    fn from(e: PredictError) -> Self {
        SleepqError::Predict(e)
    }
}

impl From<serde_json::Error> for SleepqError {
    fn from(e: serde_json::Error) -> Self {
        SleepqError::Json(e)
    }
}

impl From<ConfigError> for SleepqError {
    fn from(e: ConfigError) -> Self {
        SleepqError::Config(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<SleepqError> for CliError {
    fn from(e: SleepqError) -> Self {
        match e {
            SleepqError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths, permissions and the bind address".to_string()),
            },
            SleepqError::Predict(e @ PredictError::InvalidInput(_))
            | SleepqError::Predict(e @ PredictError::Json(_)) => CliError {
                code: "INVALID_SURVEY".to_string(),
                message: e.to_string(),
                hint: Some("Ensure the survey has all seven fields with valid values".to_string()),
            },
            SleepqError::Predict(e) if e.is_artifact_error() => CliError {
                code: "ARTIFACT_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'sleepq doctor' to check the artifacts".to_string()),
            },
            SleepqError::Predict(e) => CliError {
                code: "PREDICTION_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            SleepqError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            SleepqError::Config(e) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check HOST, PORT and the SLEEPQ_* variables".to_string()),
            },
            SleepqError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct EncodeReport {
    columns: Vec<EncodedColumn>,
    flags: Vec<EncodingFlag>,
}

#[derive(serde::Serialize)]
struct EncodedColumn {
    name: String,
    value: f64,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    service: String,
    version: String,
    scaler_path: String,
    model_path: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

impl DoctorCheck {
    fn ok(name: &str, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Ok, message)
    }

    fn warning(name: &str, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Warning, message)
    }

    fn error(name: &str, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Error, message)
    }

    fn with_status(name: &str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
        }
    }
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
