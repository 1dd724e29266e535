use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::jobs::dto::JobChanges;
use crate::jobs::repo_types::{FieldValue, Job, JobRow, JOB_COLUMNS};

/// Every method filters on `user_id = owner`; a job that belongs to someone
/// else behaves exactly like one that does not exist.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Newest first.
    async fn list(&self, owner: Uuid) -> ApiResult<Vec<Job>>;
    async fn create(&self, owner: Uuid, changes: &JobChanges) -> ApiResult<Job>;
    /// `None` when no job with `id` belongs to `owner`.
    async fn update(&self, owner: Uuid, id: Uuid, changes: &JobChanges) -> ApiResult<Option<Job>>;
    /// `false` when no job with `id` belongs to `owner`.
    async fn delete(&self, owner: Uuid, id: Uuid) -> ApiResult<bool>;
}

#[derive(Clone)]
pub struct PgJobStore {
    db: PgPool,
}

impl PgJobStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn push_value(qb: &mut QueryBuilder<'static, Postgres>, value: &FieldValue) {
    match value {
        FieldValue::Text(v) => qb.push_bind(v.clone()),
        FieldValue::Date(v) => qb.push_bind(*v),
        FieldValue::Score(v) => qb.push_bind(*v),
        FieldValue::Status(s) => qb.push_bind(s.as_str()),
    };
}

const DELETE_JOB: &str = "DELETE FROM jobs WHERE id = $1 AND user_id = $2";

fn insert_query(owner: Uuid, changes: &JobChanges) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("INSERT INTO jobs (user_id");
    for (field, _) in changes.iter() {
        qb.push(", ").push(field.column());
    }
    qb.push(") VALUES (").push_bind(owner);
    for (_, value) in changes.iter() {
        qb.push(", ");
        push_value(&mut qb, value);
    }
    qb.push(") RETURNING ").push(JOB_COLUMNS);
    qb
}

fn update_query(owner: Uuid, id: Uuid, changes: &JobChanges) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE jobs SET updated_at = now()");
    for (field, value) in changes.iter() {
        qb.push(", ").push(field.column()).push(" = ");
        push_value(&mut qb, value);
    }
    qb.push(" WHERE id = ")
        .push_bind(id)
        .push(" AND user_id = ")
        .push_bind(owner)
        .push(" RETURNING ")
        .push(JOB_COLUMNS);
    qb
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn list(&self, owner: Uuid) -> ApiResult<Vec<Job>> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await?;

        let jobs = rows
            .into_iter()
            .map(Job::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(jobs)
    }

    async fn create(&self, owner: Uuid, changes: &JobChanges) -> ApiResult<Job> {
        let mut qb = insert_query(owner, changes);
        let row = qb.build_query_as::<JobRow>().fetch_one(&self.db).await?;
        Ok(Job::try_from(row)?)
    }

    async fn update(&self, owner: Uuid, id: Uuid, changes: &JobChanges) -> ApiResult<Option<Job>> {
        let mut qb = update_query(owner, id, changes);
        let row = qb
            .build_query_as::<JobRow>()
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Job::try_from).transpose()?)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query(DELETE_JOB)
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
