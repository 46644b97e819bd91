//! JSON request handling for the occurrence preview used by the rrule widget.

use chrono::{NaiveDate, NaiveTime};
use eventcally_core::config::RecurrenceConfig;
use eventcally_rfc::rfc::recur::localize;
use eventcally_service::recurrence::{BatchResult, calculate_batch};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Widget page index, sent either as a number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StartIndex {
    Number(usize),
    Text(String),
}

impl Default for StartIndex {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl StartIndex {
    fn resolve(&self) -> AppResult<usize> {
        match self {
            Self::Number(start) => Ok(*start),
            Self::Text(text) => text.trim().parse().map_err(|err| {
                AppError::InvalidRequest(format!("start {text:?} is not an index: {err}"))
            }),
        }
    }
}

/// ## Summary
/// Occurrence preview request payload
#[derive(Debug, Clone, Deserialize)]
pub struct RruleRequest {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub rrule: String,
    #[serde(default)]
    pub start: StartIndex,
}

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// ## Summary
/// Computes the requested page of occurrences.
///
/// The anchor is midnight of `year-month-day` in the configured zone; page
/// size and display template come from the configuration.
///
/// ## Errors
/// - `AppError::InvalidRequest` for an impossible date or a non-numeric start.
/// - `AppError::CoreError` if the configured zone is unknown.
/// - `AppError::ServiceError` for an invalid rule or display template.
#[tracing::instrument(skip(config))]
pub fn handle_rrule_request(
    config: &RecurrenceConfig,
    request: &RruleRequest,
) -> AppResult<BatchResult> {
    let tz = config.timezone()?;
    let day = NaiveDate::from_ymd_opt(request.year, request.month, request.day).ok_or_else(|| {
        AppError::InvalidRequest(format!(
            "{}-{}-{} is not a calendar date",
            request.year, request.month, request.day
        ))
    })?;
    let anchor = localize(&tz, day.and_time(NaiveTime::MIN));

    let result = calculate_batch(
        &anchor,
        &config.date_format,
        &request.rrule,
        request.start.resolve()?,
        config.batch_size,
    )?;
    Ok(result)
}

/// ## Summary
/// Answers a raw JSON request body.
///
/// Returns the HTTP status and the JSON body: the batch on success,
/// `{"error": ...}` otherwise.
#[must_use]
pub fn respond(config: &RecurrenceConfig, body: &str) -> (u16, String) {
    let outcome = serde_json::from_str::<RruleRequest>(body)
        .map_err(|err| AppError::InvalidRequest(format!("Invalid request body: {err}")))
        .and_then(|request| handle_rrule_request(config, &request))
        .and_then(|result| {
            serde_json::to_string(&result).map_err(AppError::from)
        });

    match outcome {
        Ok(json) => (200, json),
        Err(err) => {
            if err.is_client_error() {
                tracing::warn!(error = %err, "Rejected occurrence preview request");
            } else {
                tracing::error!(error = %err, "Failed to compute occurrence preview");
            }
            let body = serde_json::to_string(&ErrorResponse {
                error: err.to_string(),
            })
            .unwrap_or_else(|_| String::from(r#"{"error":"Internal server error"}"#));
            (err.status_code(), body)
        }
    }
}
