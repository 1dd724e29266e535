use anyhow::Context;
use serde_json::Value;
use time::{macros::format_description, Date};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::fields;
use crate::jobs::dto::{JobChanges, JobStats};
use crate::jobs::repo_types::{FieldKind, FieldValue, Job, JobField, JobStatus};

fn invalid(key: &str, expected: &str) -> ApiError {
    ApiError::Validation(format!("Invalid job data: {key} must be {expected}"))
}

fn parse_text(key: &str, value: Value) -> ApiResult<FieldValue> {
    match value {
        Value::Null => Ok(FieldValue::Text(None)),
        Value::String(s) => Ok(FieldValue::Text(Some(s))),
        Value::Number(n) => Ok(FieldValue::Text(Some(n.to_string()))),
        _ => Err(invalid(key, "a string")),
    }
}

fn parse_date(key: &str, value: Value) -> ApiResult<FieldValue> {
    match value {
        Value::Null => Ok(FieldValue::Date(None)),
        Value::String(s) if s.trim().is_empty() => Ok(FieldValue::Date(None)),
        Value::String(s) => Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
            .map(|d| FieldValue::Date(Some(d)))
            .map_err(|_| invalid(key, "a YYYY-MM-DD date")),
        _ => Err(invalid(key, "a YYYY-MM-DD date")),
    }
}

fn parse_score(key: &str, value: Value) -> ApiResult<FieldValue> {
    let score = match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().parse::<i32>().map_err(|_| invalid(key, "an integer"))?),
        Value::Number(n) => Some(
            n.as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| invalid(key, "an integer"))?,
        ),
        _ => return Err(invalid(key, "an integer")),
    };
    Ok(FieldValue::Score(score))
}

fn parse_status(key: &str, value: Value) -> ApiResult<FieldValue> {
    let Value::String(s) = value else {
        return Err(invalid(key, "a job status"));
    };
    s.parse::<JobStatus>()
        .map(FieldValue::Status)
        .map_err(|_| ApiError::Validation(format!("Invalid job data: unknown status '{s}'")))
}

/// Turns a wire body into validated column writes.
///
/// Keys are translated to storage names and checked against [`JobField`];
/// anything else (ids, owner, timestamps, unknown keys) is dropped. Values
/// are type-checked per column, so nothing is written if any value is bad.
pub fn parse_changes(body: Value) -> ApiResult<JobChanges> {
    let Value::Object(map) = body else {
        return Err(ApiError::Validation(
            "Invalid job data: expected a JSON object".into(),
        ));
    };

    let mut changes = JobChanges::default();
    for (column, value) in fields::to_storage(map) {
        let Some(field) = JobField::from_column(&column) else {
            debug!(key = %column, "ignoring non-writable job key");
            continue;
        };
        let key = fields::to_wire_key(&column);
        let parsed = match field.kind() {
            FieldKind::Text => parse_text(&key, value)?,
            FieldKind::Date => parse_date(&key, value)?,
            FieldKind::Score => parse_score(&key, value)?,
            FieldKind::Status => parse_status(&key, value)?,
        };
        changes.fields.insert(field, parsed);
    }
    Ok(changes)
}

/// Serializes a job with wire (camelCase) keys.
pub fn job_to_wire(job: &Job) -> ApiResult<Value> {
    match serde_json::to_value(job).context("serialize job")? {
        Value::Object(map) => Ok(Value::Object(fields::to_wire(map))),
        other => Ok(other),
    }
}

pub fn compute_stats(jobs: &[Job]) -> JobStats {
    jobs.iter().fold(
        JobStats {
            total: jobs.len(),
            ..JobStats::default()
        },
        |mut stats, job| {
            if !matches!(job.status, JobStatus::NotApplied | JobStatus::Withdrawn) {
                stats.applied += 1;
            }
            if job.status.is_interviewing() {
                stats.interviews += 1;
            }
            if job.status == JobStatus::Offer {
                stats.offers += 1;
            }
            stats
        },
    )
}
