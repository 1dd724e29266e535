use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

use super::dto::{JobListResponse, JobResponse, JobStats};
use super::services::{compute_stats, job_to_wire, parse_changes};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/stats", get(job_stats))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(create_job))
        .route("/jobs/:id", put(update_job).delete(delete_job))
}

/// Malformed ids are reported like missing ones.
fn parse_job_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::job_not_found())
}

#[instrument(skip(state), fields(user_id = %auth.id))]
pub async fn list_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<JobListResponse>> {
    let jobs = state.jobs.list(auth.id).await?;
    let jobs = jobs.iter().map(job_to_wire).collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(JobListResponse { jobs }))
}

#[instrument(skip(state), fields(user_id = %auth.id))]
pub async fn job_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<JobStats>> {
    let jobs = state.jobs.list(auth.id).await?;
    Ok(Json(compute_stats(&jobs)))
}

#[instrument(skip(state, body), fields(user_id = %auth.id))]
pub async fn create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<Value>, ApiError>,
) -> ApiResult<Json<JobResponse>> {
    let changes = parse_changes(body)?;
    let job = state.jobs.create(auth.id, &changes).await?;
    info!(job_id = %job.id, "job created");
    Ok(Json(JobResponse {
        job: job_to_wire(&job)?,
    }))
}

#[instrument(skip(state, body), fields(user_id = %auth.id))]
pub async fn update_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, ApiError>,
) -> ApiResult<Json<JobResponse>> {
    let id = parse_job_id(&id)?;
    let changes = parse_changes(body)?;
    match state.jobs.update(auth.id, id, &changes).await? {
        Some(job) => {
            info!(job_id = %job.id, fields = changes.fields.len(), "job updated");
            Ok(Json(JobResponse {
                job: job_to_wire(&job)?,
            }))
        }
        None => {
            warn!(job_id = %id, "update matched no owned job");
            Err(ApiError::job_not_found())
        }
    }
}

#[instrument(skip(state), fields(user_id = %auth.id))]
pub async fn delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_job_id(&id)?;
    if !state.jobs.delete(auth.id, id).await? {
        warn!(job_id = %id, "delete matched no owned job");
        return Err(ApiError::job_not_found());
    }
    info!(job_id = %id, "job deleted");
    Ok(Json(json!({ "success": true })))
}
