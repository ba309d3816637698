//! `/training`: programmes, sessions, attendance, quizzes and certificates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::{ApiRequest, Blob};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingProgram {
    pub id: RecordId,
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgramFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub search: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgramInput {
    pub code: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: RecordId,
    pub program_id: RecordId,
    #[serde(with = "qms_core::timestamp")]
    pub session_date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub trainer_id: Option<RecordId>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInput {
    #[serde(with = "qms_core::timestamp")]
    pub session_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: RecordId,
    pub session_id: RecordId,
    pub user_id: RecordId,
    pub attended: bool,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceInput {
    pub user_id: RecordId,
    pub attended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub text: String,
    pub options: Vec<String>,
    /// Only present for quiz authors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: RecordId,
    pub program_id: RecordId,
    pub title: String,
    #[serde(default)]
    pub passing_score: Option<f64>,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizInput {
    pub title: String,
    pub passing_score: f64,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuizResult {
    pub quiz_id: RecordId,
    pub score: f64,
    pub passed: bool,
    #[serde(default)]
    pub certificate_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: RecordId,
    pub user_id: RecordId,
    pub program_id: RecordId,
    pub certificate_code: String,
    pub issued_at: NaiveDate,
    #[serde(default)]
    pub expires_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CertificateFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub user_id: Option<RecordId>,
    pub program_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredTraining {
    pub id: RecordId,
    pub program_id: RecordId,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department_id: Option<RecordId>,
    #[serde(default)]
    pub is_mandatory: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RequiredTrainingFilter {
    pub role: Option<String>,
    pub department_id: Option<RecordId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequiredTrainingInput {
    pub program_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<RecordId>,
    pub is_mandatory: bool,
}

/// The caller's own training record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MyTraining {
    #[serde(default)]
    pub required: Vec<RequiredTraining>,
    #[serde(default)]
    pub attended_sessions: Vec<TrainingSession>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub upcoming_sessions: Vec<TrainingSession>,
}

facade!(Training);

impl Training<'_> {
    pub async fn programs(&self, filter: &ProgramFilter) -> ClientResult<Page<TrainingProgram>> {
        let request = ApiRequest::get("/training/programs").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn program(&self, id: RecordId) -> ClientResult<TrainingProgram> {
        self.client
            .send(ApiRequest::get(format!("/training/programs/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create_program(&self, program: &ProgramInput) -> ClientResult<TrainingProgram> {
        let request = ApiRequest::post("/training/programs").json(program)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn sessions(&self, program_id: RecordId) -> ClientResult<Vec<TrainingSession>> {
        self.client
            .send(
                ApiRequest::get(format!("/training/programs/{program_id}/sessions")),
                Shape::Enveloped,
            )
            .await
    }

    pub async fn create_session(&self, program_id: RecordId, session: &SessionInput) -> ClientResult<TrainingSession> {
        let request = ApiRequest::post(format!("/training/programs/{program_id}/sessions")).json(session)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn attendance(&self, session_id: RecordId) -> ClientResult<Vec<Attendance>> {
        self.client
            .send(
                ApiRequest::get(format!("/training/sessions/{session_id}/attendance")),
                Shape::Enveloped,
            )
            .await
    }

    pub async fn record_attendance(
        &self,
        session_id: RecordId,
        records: &[AttendanceInput],
    ) -> ClientResult<Vec<Attendance>> {
        let request = ApiRequest::post(format!("/training/sessions/{session_id}/attendance")).json(records)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn quizzes(&self, program_id: RecordId) -> ClientResult<Vec<Quiz>> {
        self.client
            .send(
                ApiRequest::get(format!("/training/programs/{program_id}/quizzes")),
                Shape::Enveloped,
            )
            .await
    }

    pub async fn create_quiz(&self, program_id: RecordId, quiz: &QuizInput) -> ClientResult<Quiz> {
        let request = ApiRequest::post(format!("/training/programs/{program_id}/quizzes")).json(quiz)?;
        self.client.send(request, Shape::Enveloped).await
    }

    /// `answers[i]` is the chosen option index for question `i`.
    pub async fn submit_quiz(&self, quiz_id: RecordId, answers: &[usize]) -> ClientResult<QuizResult> {
        let request = ApiRequest::post(format!("/training/quizzes/{quiz_id}/submit"))
            .json(&serde_json::json!({ "answers": answers }))?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn certificates(&self, filter: &CertificateFilter) -> ClientResult<Page<Certificate>> {
        let request = ApiRequest::get("/training/certificates").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn download_certificate(&self, id: RecordId) -> ClientResult<Blob> {
        self.client
            .download(ApiRequest::get(format!("/training/certificates/{id}/download")))
            .await
    }

    pub async fn required_training(&self, filter: &RequiredTrainingFilter) -> ClientResult<Vec<RequiredTraining>> {
        let request = ApiRequest::get("/training/required").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update_required_training(
        &self,
        requirements: &[RequiredTrainingInput],
    ) -> ClientResult<Vec<RequiredTraining>> {
        let request = ApiRequest::put("/training/required").json(requirements)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn my_training(&self) -> ClientResult<MyTraining> {
        self.client
            .send(ApiRequest::get("/training/me"), Shape::Enveloped)
            .await
    }
}
