//! EI CLI - Command-line interface for the EI compute engine
//!
//! Commands:
//! - score: Score domain signals into snapshots (batch mode)
//! - run: Score streaming input from stdin (streaming mode)
//! - insights: Generate insights and recommendations for one signal set
//! - validate: Range-check domain signals
//! - doctor: Diagnose configuration and trend-file health
//! - schema: Print schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ei_core::calendar::summarize_events;
use ei_core::pipeline::parse_signals;
use ei_core::types::{CalendarEvent, CalendarSummary, DomainSignals, EiSnapshot};
use ei_core::{generate_insights, ComputeError, EiProcessor, EI_VERSION, PRODUCER_NAME};

/// EI - Deterministic compute engine for Effectiveness Index signals
#[derive(Parser)]
#[command(name = "ei")]
#[command(author = "Arcstate Labs")]
#[command(version = EI_VERSION)]
#[command(about = "Score behavioral signals into EI snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score domain signals into snapshots (batch mode)
    Score {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// User ID stamped onto snapshots
        #[arg(long, default_value = "local")]
        user_id: String,

        /// Calendar events file (JSON array of {start, end})
        #[arg(long)]
        calendar: Option<PathBuf>,

        /// Horizon in days for calendar density
        #[arg(long, default_value = "7")]
        horizon_days: u32,

        /// Trend window in snapshots
        #[arg(long, default_value = "28")]
        trend_window: usize,

        /// Load trend state from file
        #[arg(long)]
        load_trend: Option<PathBuf>,

        /// Save trend state to file after processing
        #[arg(long)]
        save_trend: Option<PathBuf>,
    },

    /// Score streaming input from stdin (streaming mode)
    Run {
        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// User ID stamped onto snapshots
        #[arg(long, default_value = "local")]
        user_id: String,

        /// Trend window in snapshots
        #[arg(long, default_value = "28")]
        trend_window: usize,

        /// Load trend state from file
        #[arg(long)]
        load_trend: Option<PathBuf>,

        /// Save trend state to file on exit
        #[arg(long)]
        save_trend: Option<PathBuf>,

        /// Flush output after each record
        #[arg(long, default_value = "true")]
        flush: bool,
    },

    /// Generate insights and recommendations for one signal set
    Insights {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Calendar events file (JSON array of {start, end})
        #[arg(long)]
        calendar: Option<PathBuf>,

        /// Horizon in days for calendar density
        #[arg(long, default_value = "7")]
        horizon_days: u32,

        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Range-check domain signals
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and trend-file health
    Doctor {
        /// Check a trend state file
        #[arg(long)]
        trend: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Single domain-signals JSON object
    Json,
    /// Newline-delimited JSON (one signal set per line)
    Ndjson,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one snapshot per line)
    Ndjson,
    /// JSON array of snapshots
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (domain signals)
    Input,
    /// Output schema (EI snapshot)
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

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

fn run(cli: Cli) -> Result<(), EiCliError> {
    match cli.command {
        Commands::Score {
            input,
            output,
            input_format,
            output_format,
            user_id,
            calendar,
            horizon_days,
            trend_window,
            load_trend,
            save_trend,
        } => cmd_score(
            &input,
            &output,
            input_format,
            output_format,
            &user_id,
            calendar.as_deref(),
            horizon_days,
            trend_window,
            load_trend.as_deref(),
            save_trend.as_deref(),
        ),

        Commands::Run {
            output_format,
            user_id,
            trend_window,
            load_trend,
            save_trend,
            flush,
        } => cmd_run(
            output_format,
            &user_id,
            trend_window,
            load_trend.as_deref(),
            save_trend.as_deref(),
            flush,
        ),

        Commands::Insights {
            input,
            calendar,
            horizon_days,
            json,
        } => cmd_insights(&input, calendar.as_deref(), horizon_days, json),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor { trend, json } => cmd_doctor(trend.as_deref(), json),

        Commands::Schema { schema_type } => cmd_schema(schema_type),
    }
}

fn cmd_score(
    input: &PathBuf,
    output: &PathBuf,
    input_format: InputFormat,
    output_format: OutputFormat,
    user_id: &str,
    calendar: Option<&Path>,
    horizon_days: u32,
    trend_window: usize,
    load_trend: Option<&Path>,
    save_trend: Option<&Path>,
) -> Result<(), EiCliError> {
    let input_data = read_input(input)?;
    let signal_sets = parse_signal_sets(&input_data, &input_format)?;

    if signal_sets.is_empty() {
        return Err(EiCliError::NoSignals);
    }

    let calendar_summary = calendar
        .map(|path| load_calendar_summary(path, horizon_days))
        .transpose()?;

    let mut processor = EiProcessor::with_trend_window(trend_window);
    if let Some(trend_path) = load_trend {
        let trend_json = fs::read_to_string(trend_path)?;
        processor.load_trend(&trend_json)?;
    }

    let mut snapshots: Vec<EiSnapshot> = Vec::new();
    for signals in signal_sets {
        let signals = match &calendar_summary {
            Some(summary) => signals.with_calendar(summary),
            None => signals,
        };
        snapshots.push(processor.compute(user_id, &signals));
    }

    if let Some(trend_path) = save_trend {
        let trend_json = processor.save_trend()?;
        fs::write(trend_path, trend_json)?;
    }

    let output_data = format_output(&snapshots, &output_format)?;
    write_output(output, &output_data)?;

    Ok(())
}

fn cmd_run(
    output_format: OutputFormat,
    user_id: &str,
    trend_window: usize,
    load_trend: Option<&Path>,
    save_trend: Option<&Path>,
    flush: bool,
) -> Result<(), EiCliError> {
    let mut processor = EiProcessor::with_trend_window(trend_window);
    if let Some(trend_path) = load_trend {
        let trend_json = fs::read_to_string(trend_path)?;
        processor.load_trend(&trend_json)?;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let signals = parse_signals(trimmed)?;
        signals.validate()?;

        let snapshot = processor.compute(user_id, &signals);
        let record = match output_format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&snapshot)?,
            _ => serde_json::to_string(&snapshot)?,
        };

        writeln!(stdout, "{}", record)?;
        if flush {
            stdout.flush()?;
        }
    }

    if let Some(trend_path) = save_trend {
        let trend_json = processor.save_trend()?;
        fs::write(trend_path, trend_json)?;
    }

    Ok(())
}

fn cmd_insights(
    input: &PathBuf,
    calendar: Option<&Path>,
    horizon_days: u32,
    json: bool,
) -> Result<(), EiCliError> {
    let input_data = read_input(input)?;
    let signals = parse_signals(&input_data)?;

    let calendar_summary = calendar
        .map(|path| load_calendar_summary(path, horizon_days))
        .transpose()?;

    let signals = match &calendar_summary {
        Some(summary) => signals.with_calendar(summary),
        None => signals,
    };

    let result = ei_core::compute_ei(&signals);
    let report = generate_insights(&result, calendar_summary.as_ref());

    if json {
        let payload = serde_json::json!({
            "result": result,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("EI Insight Report");
        println!("=================");
        println!("Score: {} ({})", result.score, result.state.as_str());
        println!("\nInsights:");
        for insight in &report.insights {
            println!("  - {}", insight);
        }
        if !report.recommendations.is_empty() {
            println!("\nRecommendations:");
            for recommendation in &report.recommendations {
                println!("  - {}", recommendation);
            }
        }
        if !report.focus_areas.is_empty() {
            println!("\nFocus areas:");
            for area in &report.focus_areas {
                println!("  - {}", area);
            }
        }
    }

    Ok(())
}

fn cmd_validate(
    input: &PathBuf,
    input_format: InputFormat,
    json: bool,
) -> Result<(), EiCliError> {
    let input_data = read_input(input)?;
    let signal_sets = parse_signal_sets(&input_data, &input_format)?;

    let errors: Vec<ValidationErrorDetail> = signal_sets
        .iter()
        .enumerate()
        .filter_map(|(index, signals)| {
            signals.validate().err().map(|e| ValidationErrorDetail {
                index,
                error: e.to_string(),
            })
        })
        .collect();

    let report = ValidationReport {
        total_signals: signal_sets.len(),
        valid_signals: signal_sets.len() - errors.len(),
        invalid_signals: errors.len(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total signal sets:   {}", report.total_signals);
        println!("Valid signal sets:   {}", report.valid_signals);
        println!("Invalid signal sets: {}", report.invalid_signals);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Signal set {}: {}", err.index, err.error);
            }
        }
    }

    if report.invalid_signals > 0 {
        Err(EiCliError::ValidationFailed(report.invalid_signals))
    } else {
        Ok(())
    }
}

fn cmd_doctor(trend: Option<&Path>, json: bool) -> Result<(), EiCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} version {}", PRODUCER_NAME, EI_VERSION),
    });

    if let Some(trend_path) = trend {
        if trend_path.exists() {
            match fs::read_to_string(trend_path) {
                Ok(content) => match ei_core::TrendStore::from_json(&content) {
                    Ok(store) => {
                        checks.push(DoctorCheck {
                            name: "trend".to_string(),
                            status: CheckStatus::Ok,
                            message: format!(
                                "Trend file valid ({} snapshots in window)",
                                store.snapshot_count()
                            ),
                        });
                    }
                    Err(e) => {
                        checks.push(DoctorCheck {
                            name: "trend".to_string(),
                            status: CheckStatus::Error,
                            message: format!("Invalid trend JSON: {}", e),
                        });
                    }
                },
                Err(e) => {
                    checks.push(DoctorCheck {
                        name: "trend".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Cannot read trend file: {}", e),
                    });
                }
            }
        } else {
            checks.push(DoctorCheck {
                name: "trend".to_string(),
                status: CheckStatus::Warning,
                message: "Trend file does not exist".to_string(),
            });
        }
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (streaming mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: EI_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("EI Doctor Report");
        println!("================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
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
        Err(EiCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType) -> Result<(), EiCliError> {
    match schema_type {
        SchemaType::Input => {
            println!("Input Schema: domain signals (one JSON object per scoring window)");
            println!();
            println!("All fields optional; an absent field falls back to its baseline.");
            println!();
            println!("Focus:    timeOnTask, plannedTime (minutes), focusRating (1-5)");
            println!("Recovery: stressEvents, recoveryTimes (minutes per spike)");
            println!("Decision: decisionsMade, indecisionMarkers, clarityRating (1-5)");
            println!("Emotion:  moodVariability, ruminationMinutes, regulationRating (1-5)");
            println!("Support:  journalEntries, practiceMinutes, programStepsCompleted");
            println!("Strategy: importantTasksCompleted, strategicRating (1-5)");
            println!("Calendar: calendarDensity (percent), eveningEvents, peakBlockHours");
        }
        SchemaType::Output => {
            println!("Output Schema: EI snapshot");
            println!();
            println!("- id, userId: snapshot and user identifiers");
            println!("- score: weighted aggregate (0-100)");
            println!("- focusEfficiency, recoveryLatency, decisionClarity,");
            println!("  emotionRegulation, supportUtilization, strategicMomentum (0-100)");
            println!("- state: FIGHT | FLIGHT | FREEZE | REGULATED");
            println!("- producer: {{ name, version, instanceId }}");
            println!("- createdAt: RFC3339 encode timestamp");
            println!("- trend (optional): {{ averageScore, scoreDeviationPct, snapshotsInWindow }}");
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &PathBuf) -> Result<String, EiCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &PathBuf, data: &str) -> Result<(), EiCliError> {
    if output.to_string_lossy() == "-" {
        print!("{}", data);
        Ok(())
    } else {
        Ok(fs::write(output, data)?)
    }
}

fn parse_signal_sets(
    input_data: &str,
    format: &InputFormat,
) -> Result<Vec<DomainSignals>, EiCliError> {
    match format {
        InputFormat::Json => Ok(vec![parse_signals(input_data)?]),
        InputFormat::Ndjson => input_data
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| parse_signals(line).map_err(EiCliError::from))
            .collect(),
    }
}

fn load_calendar_summary(path: &Path, horizon_days: u32) -> Result<CalendarSummary, EiCliError> {
    let data = fs::read_to_string(path)?;
    let events: Vec<CalendarEvent> = serde_json::from_str(&data)?;
    Ok(summarize_events(&events, horizon_days))
}

fn format_output(
    snapshots: &[EiSnapshot],
    format: &OutputFormat,
) -> Result<String, EiCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for snapshot in snapshots {
                lines.push(serde_json::to_string(snapshot)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(snapshots)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(snapshots)?),
    }
}

// Error types

#[derive(Debug)]
enum EiCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    NoSignals,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for EiCliError {
    fn from(e: io::Error) -> Self {
        EiCliError::Io(e)
    }
}

impl From<ComputeError> for EiCliError {
    fn from(e: ComputeError) -> Self {
        EiCliError::Compute(e)
    }
}

impl From<serde_json::Error> for EiCliError {
    fn from(e: serde_json::Error) -> Self {
        EiCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<EiCliError> for CliError {
    fn from(e: EiCliError) -> Self {
        match e {
            EiCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            EiCliError::Compute(e) => CliError {
                code: "COMPUTE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'ei schema input' for the expected signal shape".to_string()),
            },
            EiCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            EiCliError::NoSignals => CliError {
                code: "NO_SIGNALS".to_string(),
                message: "No signal sets found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            EiCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} signal sets failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            EiCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_signals: usize,
    valid_signals: usize,
    invalid_signals: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    error: String,
}

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

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
