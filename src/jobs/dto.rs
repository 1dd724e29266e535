use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::jobs::repo_types::{FieldValue, JobField};

/// Validated set of column writes for a create or update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobChanges {
    pub fields: BTreeMap<JobField, FieldValue>,
}

impl JobChanges {
    pub fn iter(&self) -> impl Iterator<Item = (&JobField, &FieldValue)> {
        self.fields.iter()
    }
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: Value,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct JobStats {
    pub total: usize,
    pub applied: usize,
    pub interviews: usize,
    pub offers: usize,
}
