use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Columns selected or returned for every job query.
pub const JOB_COLUMNS: &str = "id, user_id, company, position, salary, location, job_type, \
    status, application_date, follow_up_date, job_description, responsibilities, \
    qualifications, skills, ats_score, resume_version, job_url, recruiter_name, \
    recruiter_email, recruiter_linked_in, notes, interview_dates, created_at, updated_at";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum JobStatus {
    #[default]
    #[serde(rename = "Not Applied")]
    NotApplied,
    Applied,
    #[serde(rename = "Phone Screen")]
    PhoneScreen,
    #[serde(rename = "Technical Interview")]
    TechnicalInterview,
    #[serde(rename = "Final Round")]
    FinalRound,
    Offer,
    Rejected,
    Withdrawn,
}

impl JobStatus {
    pub const ALL: [JobStatus; 8] = [
        JobStatus::NotApplied,
        JobStatus::Applied,
        JobStatus::PhoneScreen,
        JobStatus::TechnicalInterview,
        JobStatus::FinalRound,
        JobStatus::Offer,
        JobStatus::Rejected,
        JobStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::NotApplied => "Not Applied",
            JobStatus::Applied => "Applied",
            JobStatus::PhoneScreen => "Phone Screen",
            JobStatus::TechnicalInterview => "Technical Interview",
            JobStatus::FinalRound => "Final Round",
            JobStatus::Offer => "Offer",
            JobStatus::Rejected => "Rejected",
            JobStatus::Withdrawn => "Withdrawn",
        }
    }

    pub fn is_interviewing(&self) -> bool {
        matches!(
            self,
            JobStatus::PhoneScreen | JobStatus::TechnicalInterview | JobStatus::FinalRound
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown job status: {s}"))
    }
}

/// How a column's value is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Score,
    Status,
}

/// Client-writable job columns. Anything not listed here never reaches SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobField {
    Company,
    Position,
    Salary,
    Location,
    JobType,
    Status,
    ApplicationDate,
    FollowUpDate,
    JobDescription,
    Responsibilities,
    Qualifications,
    Skills,
    AtsScore,
    ResumeVersion,
    JobUrl,
    RecruiterName,
    RecruiterEmail,
    RecruiterLinkedIn,
    Notes,
    InterviewDates,
}

impl JobField {
    pub const ALL: [JobField; 20] = [
        JobField::Company,
        JobField::Position,
        JobField::Salary,
        JobField::Location,
        JobField::JobType,
        JobField::Status,
        JobField::ApplicationDate,
        JobField::FollowUpDate,
        JobField::JobDescription,
        JobField::Responsibilities,
        JobField::Qualifications,
        JobField::Skills,
        JobField::AtsScore,
        JobField::ResumeVersion,
        JobField::JobUrl,
        JobField::RecruiterName,
        JobField::RecruiterEmail,
        JobField::RecruiterLinkedIn,
        JobField::Notes,
        JobField::InterviewDates,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            JobField::Company => "company",
            JobField::Position => "position",
            JobField::Salary => "salary",
            JobField::Location => "location",
            JobField::JobType => "job_type",
            JobField::Status => "status",
            JobField::ApplicationDate => "application_date",
            JobField::FollowUpDate => "follow_up_date",
            JobField::JobDescription => "job_description",
            JobField::Responsibilities => "responsibilities",
            JobField::Qualifications => "qualifications",
            JobField::Skills => "skills",
            JobField::AtsScore => "ats_score",
            JobField::ResumeVersion => "resume_version",
            JobField::JobUrl => "job_url",
            JobField::RecruiterName => "recruiter_name",
            JobField::RecruiterEmail => "recruiter_email",
            JobField::RecruiterLinkedIn => "recruiter_linked_in",
            JobField::Notes => "notes",
            JobField::InterviewDates => "interview_dates",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        JobField::ALL.into_iter().find(|f| f.column() == column)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            JobField::Status => FieldKind::Status,
            JobField::ApplicationDate | JobField::FollowUpDate => FieldKind::Date,
            JobField::AtsScore => FieldKind::Score,
            _ => FieldKind::Text,
        }
    }
}

/// A validated value for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(Option<String>),
    Date(Option<Date>),
    Score(Option<i32>),
    Status(JobStatus),
}

/// Job row as read from the database.
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: Option<String>,
    pub position: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub status: String,
    pub application_date: Option<Date>,
    pub follow_up_date: Option<Date>,
    pub job_description: Option<String>,
    pub responsibilities: Option<String>,
    pub qualifications: Option<String>,
    pub skills: Option<String>,
    pub ats_score: Option<i32>,
    pub resume_version: Option<String>,
    pub job_url: Option<String>,
    pub recruiter_name: Option<String>,
    pub recruiter_email: Option<String>,
    pub recruiter_linked_in: Option<String>,
    pub notes: Option<String>,
    pub interview_dates: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A job application. Serializes with storage (snake_case) keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: Option<String>,
    pub position: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub status: JobStatus,
    #[serde(with = "iso_date::option")]
    pub application_date: Option<Date>,
    #[serde(with = "iso_date::option")]
    pub follow_up_date: Option<Date>,
    pub job_description: Option<String>,
    pub responsibilities: Option<String>,
    pub qualifications: Option<String>,
    pub skills: Option<String>,
    pub ats_score: Option<i32>,
    pub resume_version: Option<String>,
    pub job_url: Option<String>,
    pub recruiter_name: Option<String>,
    pub recruiter_email: Option<String>,
    pub recruiter_linked_in: Option<String>,
    pub notes: Option<String>,
    pub interview_dates: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TryFrom<JobRow> for Job {
    type Error = anyhow::Error;

    fn try_from(r: JobRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            company: r.company,
            position: r.position,
            salary: r.salary,
            location: r.location,
            job_type: r.job_type,
            status: r.status.parse()?,
            application_date: r.application_date,
            follow_up_date: r.follow_up_date,
            job_description: r.job_description,
            responsibilities: r.responsibilities,
            qualifications: r.qualifications,
            skills: r.skills,
            ats_score: r.ats_score,
            resume_version: r.resume_version,
            job_url: r.job_url,
            recruiter_name: r.recruiter_name,
            recruiter_email: r.recruiter_email,
            recruiter_linked_in: r.recruiter_linked_in,
            notes: r.notes,
            interview_dates: r.interview_dates,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}
