use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use maintenance_report::config::AppConfig;
use maintenance_report::error::AppError;
use maintenance_report::telemetry;
use maintenance_report::workflows::daily::{
    append_task_metrics, render, write_snapshot, DailyReport, ReportSnapshot, TaskCount,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Maintenance Reporting Service",
    about = "Turn daily technician status updates into structured maintenance reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate today's report from pasted update text
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// File holding the daily update text (reads stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Report date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Override the configured activity-email recipient
    #[arg(long)]
    recipient: Option<String>,
    /// Override the configured email sender
    #[arg(long)]
    sender: Option<String>,
    /// Override the configured JSON snapshot path
    #[arg(long)]
    json_out: Option<PathBuf>,
    /// Override the configured technician metrics CSV path
    #[arg(long)]
    metrics_csv: Option<PathBuf>,
    /// Print the report without writing the snapshot or metrics history
    #[arg(long)]
    no_save: bool,
}

fn default_recipient() -> String {
    "Bryan".to_string()
}

fn default_sender() -> String {
    "Daniel".to_string()
}

#[derive(Debug, Deserialize)]
struct DailyReportRequest {
    text: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    date: Option<NaiveDate>,
    #[serde(default)]
    include_emails: bool,
    #[serde(default = "default_recipient")]
    recipient: String,
    #[serde(default = "default_sender")]
    sender: String,
}

#[derive(Debug, Serialize)]
struct DailyReportResponse {
    date: NaiveDate,
    #[serde(flatten)]
    report: DailyReport,
    task_counts: Vec<TaskCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emails: Option<ReportEmails>,
}

#[derive(Debug, Serialize)]
struct ReportEmails {
    activity: String,
    department: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Report(args) => run_report(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/daily/report", post(daily_report_endpoint))
        .layer(prometheus_layer)
        .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "maintenance reporting service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let ReportArgs {
        input,
        date,
        recipient,
        sender,
        json_out,
        metrics_csv,
        no_save,
    } = args;

    let text = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let recipient = recipient.unwrap_or(config.report.recipient);
    let sender = sender.unwrap_or(config.report.sender);
    let snapshot_path = json_out.unwrap_or(config.report.snapshot_path);
    let metrics_path = metrics_csv.unwrap_or(config.report.metrics_csv_path);

    let report = DailyReport::from_text(&text);
    let activity_email = render::technician_activity_email(&report, &recipient, &sender);
    let department_email = render::department_update_email(&report, &sender);

    render_daily_report(&report, &activity_email, &department_email, date);

    if no_save {
        return Ok(());
    }

    let snapshot = ReportSnapshot::new(date, &report, &activity_email, &department_email);
    write_snapshot(&snapshot_path, &snapshot)?;
    append_task_metrics(&metrics_path, date, &snapshot.task_counts)?;
    println!(
        "\nReport saved to {} and metrics appended to {}.",
        snapshot_path.display(),
        metrics_path.display()
    );

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stateless: the engine is a pure function of the posted text, so the
/// endpoint never persists and never fails.
async fn daily_report_endpoint(Json(payload): Json<DailyReportRequest>) -> Json<DailyReportResponse> {
    let DailyReportRequest {
        text,
        date,
        include_emails,
        recipient,
        sender,
    } = payload;

    let report = DailyReport::from_text(&text);
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let task_counts = report.task_counts();

    let emails = include_emails.then(|| ReportEmails {
        activity: render::technician_activity_email(&report, &recipient, &sender),
        department: render::department_update_email(&report, &sender),
    });

    Json(DailyReportResponse {
        date,
        report,
        task_counts,
        emails,
    })
}

fn render_daily_report(
    report: &DailyReport,
    activity_email: &str,
    department_email: &str,
    date: NaiveDate,
) {
    println!("Daily maintenance report for {date}");
    println!(
        "Technicians: {}, suspended: {}, PTO: {}, training: {}, contractor notes: {}, material notes: {}",
        report.technicians.len(),
        report.suspended.len(),
        report.on_leave.len(),
        report.in_training.len(),
        report.contractor_notes.len(),
        report.material_notes.len()
    );

    println!("\n=== Email 1: Technician Activity Report ===\n");
    println!("{activity_email}");
    println!("\n=== Email 2: Maintenance Department Update ===\n");
    println!("{department_email}");

    let counts = report.task_counts();
    if !counts.is_empty() {
        println!("\n{}", render::task_count_chart(&counts));
    }

    if !report.material_notes.is_empty() {
        println!("Material requests:");
        for note in &report.material_notes {
            println!("- {note}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn request_for(text: &str, include_emails: bool) -> DailyReportRequest {
        DailyReportRequest {
            text: text.to_string(),
            date: Some(NaiveDate::from_ymd_opt(2026, 8, 29).expect("valid date")),
            include_emails,
            recipient: default_recipient(),
            sender: default_sender(),
        }
    }

    #[tokio::test]
    async fn daily_report_endpoint_returns_structured_report() {
        let request = request_for(
            "Alice Replaced pump seal\nBob Suspended\nneed two more gaskets",
            false,
        );

        let Json(body) = daily_report_endpoint(Json(request)).await;

        assert_eq!(body.report.suspended, vec!["Bob"]);
        assert_eq!(body.report.material_notes, vec!["need two more gaskets"]);
        assert_eq!(body.task_counts.len(), 1);
        assert_eq!(body.task_counts[0].technician, "Alice");
        assert!(body.emails.is_none());
    }

    #[tokio::test]
    async fn daily_report_endpoint_can_include_emails() {
        let request = request_for("Carl Completed training\nran diagnostics", true);

        let Json(body) = daily_report_endpoint(Json(request)).await;

        assert_eq!(body.report.in_training, vec!["Carl"]);
        let emails = body.emails.expect("emails rendered");
        assert!(emails.activity.contains("Hi Bryan,"));
        assert!(emails.activity.contains("• ran diagnostics"));
        assert!(emails.department.starts_with("Subject: Maintenance Department Update"));
    }

    #[tokio::test]
    async fn report_route_round_trips_over_http() {
        let app = Router::new()
            .route("/health", get(healthcheck))
            .route("/api/v1/daily/report", post(daily_report_endpoint));

        let payload = json!({
            "text": "Alice Replaced pump seal\nflushed lines",
            "date": "2026-08-29",
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/daily/report")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds");

        let response = app.oneshot(request).await.expect("handler responds");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["date"], "2026-08-29");
        assert_eq!(body["technicians"][0]["name"], "Alice");
        assert_eq!(body["technicians"][0]["tasks"][1], "flushed lines");
        assert_eq!(body["task_counts"][0]["count"], 2);
        assert!(body.get("emails").is_none());
    }

    #[tokio::test]
    async fn invalid_date_in_request_is_rejected() {
        let raw = json!({ "text": "Alice Checked boiler", "date": "29-08-2026" });
        let parsed: Result<DailyReportRequest, _> = serde_json::from_value(raw);
        assert!(parsed.is_err());
    }
}
