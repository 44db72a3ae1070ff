//! stress-predict CLI
//!
//! Commands:
//! - predict: run the interactive questionnaire and classify the answers
//! - schema: print the questionnaire definition
//! - doctor: diagnose artifact, schema, and sink configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stress_predict::form::{self, AnswerError, PromptKind};
use stress_predict::{
    log_outcome, CredentialSource, Dataset, FeatureSchema, ModelArtifact, OutcomeRecord,
    PredictError, SheetsSink, StressLevel, StressPredictor, PRODUCER_NAME, VERSION,
};

const RESET: &str = "\x1b[0m";

/// Environment fallbacks for sink configuration
const ENDPOINT_ENV: &str = "STRESS_PREDICT_SHEET_ENDPOINT";
const TOKEN_ENV: &str = "STRESS_PREDICT_SHEET_TOKEN";

/// stress-predict - questionnaire-driven stress level classifier
#[derive(Parser)]
#[command(name = "stress-predict")]
#[command(version = VERSION)]
#[command(about = "Predict a three-class stress level from a lifestyle questionnaire", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive questionnaire and classify the answers
    Predict {
        /// Path to the persisted {scaler, model} artifact
        #[arg(long, default_value = "stress_level_model.json")]
        artifact: PathBuf,

        /// Where feature domains come from
        #[arg(long, value_enum, default_value = "canonical")]
        domains: DomainSource,

        /// Reference dataset CSV (required with --domains dataset)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Lower bound with --domains fixed
        #[arg(long, default_value = "0")]
        fixed_min: i64,

        /// Upper bound with --domains fixed
        #[arg(long, default_value = "100")]
        fixed_max: i64,

        /// Spreadsheet append endpoint (falls back to STRESS_PREDICT_SHEET_ENDPOINT)
        #[arg(long)]
        sheet_endpoint: Option<String>,

        /// Spreadsheet name for the append payload
        #[arg(long, default_value = "StressPredictResults")]
        spreadsheet: String,

        /// Service credential file (falls back to STRESS_PREDICT_SHEET_TOKEN)
        #[arg(long)]
        credentials_file: Option<PathBuf>,

        /// Skip the spreadsheet append entirely
        #[arg(long)]
        no_log: bool,
    },

    /// Print the questionnaire definition
    Schema {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose artifact, schema, and sink configuration
    Doctor {
        /// Path to the persisted {scaler, model} artifact
        #[arg(long, default_value = "stress_level_model.json")]
        artifact: PathBuf,

        /// Reference dataset CSV to check, if any
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Service credential file to check, if any
        #[arg(long)]
        credentials_file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DomainSource {
    /// Dataset-derived literal ranges frozen into the crate
    Canonical,
    /// Ranges scanned from --dataset at startup
    Dataset,
    /// One fixed range for every non-binary feature
    Fixed,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Predict {
            artifact,
            domains,
            dataset,
            fixed_min,
            fixed_max,
            sheet_endpoint,
            spreadsheet,
            credentials_file,
            no_log,
        } => cmd_predict(
            &artifact,
            domains,
            dataset.as_deref(),
            fixed_min,
            fixed_max,
            sheet_endpoint,
            &spreadsheet,
            credentials_file,
            no_log,
        ),

        Commands::Schema { json } => cmd_schema(json),

        Commands::Doctor {
            artifact,
            dataset,
            credentials_file,
            json,
        } => cmd_doctor(&artifact, dataset.as_deref(), credentials_file.as_deref(), json),
    }
}

fn build_schema(
    domains: DomainSource,
    dataset: Option<&Path>,
    fixed_min: i64,
    fixed_max: i64,
) -> Result<FeatureSchema, CliError> {
    match domains {
        DomainSource::Canonical => Ok(FeatureSchema::canonical()),
        DomainSource::Dataset => {
            let path = dataset.ok_or(CliError::MissingDataset)?;
            let dataset = Dataset::from_path(path)?;
            Ok(FeatureSchema::from_dataset(&dataset)?)
        }
        DomainSource::Fixed => Ok(FeatureSchema::with_fixed_range(fixed_min, fixed_max)),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_predict(
    artifact_path: &Path,
    domains: DomainSource,
    dataset: Option<&Path>,
    fixed_min: i64,
    fixed_max: i64,
    sheet_endpoint: Option<String>,
    spreadsheet: &str,
    credentials_file: Option<PathBuf>,
    no_log: bool,
) -> Result<(), CliError> {
    // ModelLoad is fatal: the process must not serve without the artifact
    let artifact = ModelArtifact::from_path(artifact_path)?;
    let schema = build_schema(domains, dataset, fixed_min, fixed_max)?;
    let predictor = StressPredictor::new(schema, artifact)?;

    let interactive = atty::is(atty::Stream::Stdin);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    println!("Prediksi Tingkat Stres");
    println!("Jawab pertanyaan berikut untuk memprediksi tingkat stres kamu.\n");

    let user_name = read_user_name(&mut lines, &mut stdout, interactive)?;

    let level = loop {
        let answers = collect_answers(&predictor, &mut lines, &mut stdout, interactive)?;

        match predictor.predict(&answers) {
            Ok(level) => break level,
            // malformed input: ask again instead of logging a partial record
            Err(PredictError::Inference(msg)) if interactive => {
                println!("Jawaban kamu belum bisa diproses ({}). Coba isi lagi ya.\n", msg);
            }
            Err(e) => return Err(e.into()),
        }
    };

    render_result_block(&level);

    if !no_log {
        let endpoint = sheet_endpoint.or_else(|| std::env::var(ENDPOINT_ENV).ok());
        match endpoint {
            Some(endpoint) => {
                let credential = match credentials_file {
                    Some(path) => CredentialSource::File(path),
                    None => CredentialSource::Env(TOKEN_ENV.to_string()),
                };
                let record = OutcomeRecord::new(user_name, level);
                match SheetsSink::new(endpoint, spreadsheet, credential) {
                    // best-effort: the result above stays on screen either way
                    Ok(sink) => {
                        log_outcome(&sink, &record);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "could not construct spreadsheet sink");
                    }
                }
            }
            None => {
                tracing::info!("no sheet endpoint configured; outcome not logged");
            }
        }
    }

    Ok(())
}

fn read_user_name(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    stdout: &mut impl Write,
    interactive: bool,
) -> Result<String, CliError> {
    loop {
        write!(stdout, "Masukkan nama kamu (contoh: Jackbar): ")?;
        stdout.flush()?;

        let line = lines.next().ok_or(CliError::InputClosed)??;
        match form::validate_user_name(&line) {
            Ok(name) => return Ok(name.to_string()),
            Err(_) if interactive => {
                println!("Yukk tulis nama kamu dulu.");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn collect_answers(
    predictor: &StressPredictor,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    stdout: &mut impl Write,
    interactive: bool,
) -> Result<Vec<i64>, CliError> {
    let mut answers = Vec::with_capacity(predictor.schema().len());

    for descriptor in predictor.schema().describe() {
        println!("{}", descriptor.prompt);
        match form::prompt_kind(descriptor) {
            PromptKind::Slider { min, max } => {
                println!("  (angka {} sampai {})", min, max);
            }
            PromptKind::Choice { labels } => {
                for (i, label) in labels.iter().enumerate() {
                    println!("  {}) {}", i, label);
                }
            }
        }

        let value = loop {
            write!(stdout, "> ")?;
            stdout.flush()?;
            let line = lines.next().ok_or(CliError::InputClosed)??;

            match form::parse_answer(descriptor, &line) {
                Ok(value) => break value,
                Err(e) if interactive => println!("{}. Coba lagi.", reprompt_text(&e)),
                Err(e) => return Err(CliError::BadAnswer(descriptor.name.clone(), e)),
            }
        };

        if let Some(note) = form::annotation(descriptor, value) {
            println!("Keterangan: {}", note);
        }
        println!("{}", "-".repeat(40));

        answers.push(value);
    }

    Ok(answers)
}

fn reprompt_text(err: &AnswerError) -> String {
    match err {
        AnswerError::NotANumber(raw) => format!("'{}' bukan angka", raw),
        AnswerError::OutOfRange { min, max, .. } => {
            format!("Jawaban harus antara {} dan {}", min, max)
        }
    }
}

fn render_result_block(level: &StressLevel) {
    let p = level.presentation();
    let color = p.color.ansi();
    let frame = "=".repeat(56);

    println!();
    println!("{}{}{}", color, frame, RESET);
    println!(
        "{} {}  Hasil Prediksi: Tingkat stres kamu adalah {}{}",
        color, p.emoji, p.label, RESET
    );
    println!("{} {}{}", color, p.advisory, RESET);
    println!("{}{}{}", color, frame, RESET);
}

fn cmd_schema(json: bool) -> Result<(), CliError> {
    let schema = FeatureSchema::canonical();

    if json {
        println!("{}", serde_json::to_string_pretty(schema.describe())?);
        return Ok(());
    }

    println!("Questionnaire ({} features, fixed order)", schema.len());
    println!("{}", "=".repeat(44));
    for descriptor in schema.describe() {
        let (min, max) = descriptor.domain.bounds();
        println!("{} [{}..{}]", descriptor.name, min, max);
        println!("  {}", descriptor.prompt);
        if let Some(labels) = &descriptor.bin_labels {
            println!("  bins: {} / {} / {}", labels[0], labels[1], labels[2]);
        }
    }
    Ok(())
}

fn cmd_doctor(
    artifact_path: &Path,
    dataset: Option<&Path>,
    credentials_file: Option<&Path>,
    json: bool,
) -> Result<(), CliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    match ModelArtifact::from_path(artifact_path) {
        Ok(artifact) => {
            checks.push(DoctorCheck::ok(
                "artifact",
                format!("loaded, {} features", artifact.width()),
            ));
            let schema = FeatureSchema::canonical();
            if artifact.width() == schema.len() {
                checks.push(DoctorCheck::ok(
                    "schema",
                    format!("canonical schema width matches ({})", schema.len()),
                ));
            } else {
                checks.push(DoctorCheck::error(
                    "schema",
                    format!(
                        "artifact expects {} features, canonical schema has {}",
                        artifact.width(),
                        schema.len()
                    ),
                ));
            }
        }
        Err(e) => checks.push(DoctorCheck::error("artifact", e.to_string())),
    }

    if let Some(path) = dataset {
        match Dataset::from_path(path) {
            Ok(ds) => checks.push(DoctorCheck::ok(
                "dataset",
                format!("{} rows scanned", ds.rows()),
            )),
            Err(e) => checks.push(DoctorCheck::error("dataset", e.to_string())),
        }
    }

    let credential = match credentials_file {
        Some(path) if path.exists() => DoctorCheck::ok("credential", "credentials file present"),
        Some(path) => DoctorCheck::error(
            "credential",
            format!("credentials file {} does not exist", path.display()),
        ),
        None if std::env::var(TOKEN_ENV).is_ok() => {
            DoctorCheck::ok("credential", format!("{} is set", TOKEN_ENV))
        }
        None => DoctorCheck::warn(
            "credential",
            format!("no credentials file and {} is unset; logging will be skipped", TOKEN_ENV),
        ),
    };
    checks.push(credential);

    if std::env::var(ENDPOINT_ENV).is_err() {
        checks.push(DoctorCheck::warn(
            "endpoint",
            format!("{} is unset; pass --sheet-endpoint to predict", ENDPOINT_ENV),
        ));
    }

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("stress-predict doctor");
        println!("=====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!();
        for check in &report.checks {
            let icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Error types

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Predict(PredictError),
    Json(serde_json::Error),
    MissingDataset,
    InputClosed,
    BadAnswer(String, AnswerError),
    DoctorFailed,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{}", e),
            CliError::Predict(e) => write!(f, "{}", e),
            CliError::Json(e) => write!(f, "{}", e),
            CliError::MissingDataset => {
                write!(f, "--domains dataset requires --dataset <path>")
            }
            CliError::InputClosed => write!(f, "input ended before the form was complete"),
            CliError::BadAnswer(feature, e) => {
                write!(f, "invalid answer for {}: {}", feature, e)
            }
            CliError::DoctorFailed => write!(f, "one or more health checks failed"),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<PredictError> for CliError {
    fn from(e: PredictError) -> Self {
        CliError::Predict(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
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
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.into(),
        }
    }

    fn warn(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.into(),
        }
    }

    fn error(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
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
