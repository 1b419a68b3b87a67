//! Run one exam session end to end against the simulated monitors.
//!
//! The countdown is accelerated: every real second advances the session
//! clock by `--speed` seconds, while each monitor samples once per real
//! second.

use std::time::Duration;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tokio::sync::broadcast::error::RecvError;

use proctor_api::{Collaborators, build_state};
use proctor_core::config::AppConfig;
use proctor_core::error::{AppError, ErrorKind};
use proctor_core::events::ExamEvent;
use proctor_core::types::{SessionId, StudentId, TestId, ViolationEntry};
use proctor_entity::exam::{ExamDefinition, Question};
use proctor_entity::session::SessionReport;

use crate::output::{self, OutputFormat};

const SIMULATION_TEST_ID: &str = "simulation";

/// Arguments for the simulate command
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Allotted exam time in simulated seconds
    #[arg(short, long, default_value_t = 120)]
    pub duration: u64,

    /// Simulated seconds per real second
    #[arg(long, default_value_t = 20)]
    pub speed: u64,

    /// Seed for the simulated classifiers
    #[arg(long)]
    pub seed: Option<u64>,

    /// Refuse the camera and microphone grant
    #[arg(long)]
    pub deny_camera: bool,

    /// Student taking the simulated exam
    #[arg(long, default_value = "student-1")]
    pub student: String,
}

/// One row of the printed violation log
#[derive(Debug, Serialize, Tabled)]
struct ViolationRow {
    #[tabled(rename = "#")]
    sequence: u32,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Details")]
    details: String,
}

impl From<&ViolationEntry> for ViolationRow {
    fn from(entry: &ViolationEntry) -> Self {
        Self {
            sequence: entry.sequence,
            source: entry.source.to_string(),
            severity: entry.severity.to_string(),
            time: entry.timestamp.format("%H:%M:%S%.3f").to_string(),
            details: entry.details.clone(),
        }
    }
}

/// Execute the simulate command
pub async fn execute(
    args: &SimulateArgs,
    mut config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    if args.duration == 0 || args.speed == 0 {
        return Err(AppError::validation("--duration and --speed must be positive"));
    }

    config.exam.auto_tick = true;
    config.exam.tick_interval_ms = 1000;
    config.exam.seconds_per_tick = args.speed;
    config.exam.heartbeat_timeout_seconds = 0;
    config.monitoring.sample_interval_seconds = 1;
    config.detection.capability_available = !args.deny_camera;
    if args.seed.is_some() {
        config.detection.seed = args.seed;
    }
    config.validate()?;

    let collaborators = Collaborators::simulated(&config);
    let state = build_state(config, collaborators);
    state.catalog.insert(ExamDefinition {
        id: TestId::new(SIMULATION_TEST_ID),
        title: "Simulated exam".to_string(),
        subject: "Simulation".to_string(),
        duration_seconds: args.duration,
        questions: vec![Question::short("1", "Describe your setup.")],
    })?;

    let mut events = state.sessions.events().subscribe();
    let created = state
        .sessions
        .create_session(
            TestId::new(SIMULATION_TEST_ID),
            StudentId::new(args.student.as_str()),
        )
        .await?;
    let id = created.session.id();

    match state.sessions.start(&id).await {
        Ok(_) => {
            println!(
                "Session {id} running: {}s at {}x",
                args.duration, args.speed
            );
            wait_for_result(&mut events, id, real_time_budget(args)).await?;
        }
        Err(e) if e.kind == ErrorKind::DeviceUnavailable => {
            println!("Start refused: {}", e.message);
        }
        Err(e) => return Err(e),
    }

    let report = state.sessions.get(&id).await?;
    print_report(&report, format);
    Ok(())
}

/// Real time after which the simulation gives up waiting.
fn real_time_budget(args: &SimulateArgs) -> Duration {
    Duration::from_secs(args.duration.div_ceil(args.speed) + 5)
}

async fn wait_for_result(
    events: &mut tokio::sync::broadcast::Receiver<proctor_core::events::DomainEvent>,
    id: SessionId,
    budget: Duration,
) -> Result<(), AppError> {
    let wait = async {
        loop {
            match events.recv().await {
                Ok(event) if event.payload.session_id() == id => match event.payload {
                    ExamEvent::ViolationRecorded {
                        source,
                        severity,
                        count,
                        ..
                    } => println!("  violation {count}: {source} ({severity})"),
                    ExamEvent::ResultAcknowledged { .. } | ExamEvent::ResultFailed { .. } => {
                        return Ok(());
                    }
                    _ => {}
                },
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => {
                    return Err(AppError::internal("Event bus closed before the session ended"));
                }
            }
        }
    };

    tokio::time::timeout(budget, wait)
        .await
        .map_err(|_| AppError::internal("Simulated session did not finish in time"))?
}

fn print_report(report: &SessionReport, format: OutputFormat) {
    let session = &report.session;
    println!();
    output::print_kv("Status", session.status().as_str());
    if let Some(reason) = session.termination_reason() {
        output::print_kv("Termination reason", reason.as_str());
    }
    output::print_kv(
        "Remaining",
        &format!(
            "{}s of {}s",
            session.remaining_seconds(),
            session.duration_seconds()
        ),
    );
    output::print_kv(
        "Violations",
        &format!(
            "{} (threshold {})",
            session.violation_count(),
            session.violation_threshold()
        ),
    );
    println!();

    let rows: Vec<ViolationRow> = session.violation_log().iter().map(ViolationRow::from).collect();
    output::print_list(&rows, format);
}
