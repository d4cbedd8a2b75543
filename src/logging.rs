//! Request logging and subscriber setup.
//!
//! Every request runs inside a `request` span carrying its id, method and
//! matched path, so events logged by handlers and services can be tied back
//! to it. When the response is ready one completion event is emitted with
//! status, latency, the authenticated caller and the error kind, if any.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, debug, error, field, info, info_span, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use activecenter_auth::Principal;
use activecenter_core::ErrorKind;

pub const LOG_DIR: &str = "storage/logs";

/// Who made a finished request and how it failed, read from the extensions
/// the guard and [`activecenter_core::AppError`] leave on the response.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub user_id: Option<Uuid>,
    pub error_kind: Option<ErrorKind>,
}

impl RequestOutcome {
    pub fn of(response: &Response) -> Self {
        Self {
            user_id: response.extensions().get::<Principal>().map(|p| p.id),
            error_kind: response.extensions().get::<ErrorKind>().copied(),
        }
    }
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %req.method(),
        path = %path,
    );
    span.in_scope(|| debug!("Incoming request"));

    let response = next.run(req).instrument(span.clone()).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis() as u64;
    let outcome = RequestOutcome::of(&response);
    let user_id = outcome.user_id.map(field::display);
    let error_kind = outcome.error_kind.map(field::display);

    span.in_scope(|| match status {
        500..=599 => error!(status, latency_ms, user_id, error_kind, "Server error"),
        400..=499 => warn!(status, latency_ms, user_id, error_kind, "Client error"),
        _ => info!(status, latency_ms, user_id, "Request completed"),
    });

    response
}

/// Installs the global subscriber: a compact console layer filtered by
/// `RUST_LOG`, a daily error log and a daily JSON log under `log_dir`.
pub fn init_tracing(log_dir: &str) -> std::io::Result<()> {
    use std::fs;
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    fs::create_dir_all(log_dir)?;

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,activecenter_db=info,tower_http=warn,axum::rejection=trace",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "activecenter.log");

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    // Structured logs for ingestion by a log collector
    let json_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "activecenter.json");

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .init();

    Ok(())
}
