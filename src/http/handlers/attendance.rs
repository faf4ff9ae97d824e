use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::http::types::AppState;
use crate::speech::{SpeechError, SpeechRecognizer};
use crate::{db, matcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    /// Capture is in progress; clients may show a prompt while they wait.
    Listening,
    Success,
    Error,
}

/// Payload answered to the asynchronous attendance client — never a redirect.
#[derive(Debug, Serialize)]
pub struct AttendanceOutcome {
    pub status: AttendanceStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
}

impl AttendanceOutcome {
    fn error(message: impl Into<String>) -> Self {
        Self {
            status: AttendanceStatus::Error,
            message: message.into(),
            student_name: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TakeAttendanceForm {
    pub ders_id: i64,
}

/// The transcription round trip finishes before the store connection is
/// opened: the connection must not be held across the await.
pub async fn take_attendance(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TakeAttendanceForm>,
) -> Json<AttendanceOutcome> {
    let transcript = match state
        .recognizer
        .listen_and_transcribe(&state.config.speech.locale)
        .await
    {
        Ok(t) => t,
        Err(e) => return Json(speech_error_outcome(e)),
    };
    log::info!("recognized name: {}", transcript);

    let conn = match db::connect(&state.config.db_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("store open failed: {}", e);
            return Json(AttendanceOutcome::error("Attendance could not be saved"));
        }
    };
    Json(resolve_and_record(&conn, &transcript, form.ders_id))
}

/// The full voice-attendance sequence as one call, for driving the flow with
/// a scripted recognizer.
pub async fn run(
    conn: &Connection,
    recognizer: &dyn SpeechRecognizer,
    locale: &str,
    course_id: i64,
) -> AttendanceOutcome {
    match recognizer.listen_and_transcribe(locale).await {
        Ok(transcript) => resolve_and_record(conn, &transcript, course_id),
        Err(e) => speech_error_outcome(e),
    }
}

fn speech_error_outcome(err: SpeechError) -> AttendanceOutcome {
    match err {
        SpeechError::NoSpeech => AttendanceOutcome::error("The audio could not be understood"),
        SpeechError::Service(e) => {
            log::warn!("transcription service failed: {}", e);
            AttendanceOutcome::error("Speech recognition service error")
        }
    }
}

/// Fuzzy-match the transcript against the course roster and insert one
/// attendance row on a hit. Below-threshold and empty-roster lookups are the
/// same outcome: the student is not enrolled here.
pub fn resolve_and_record(
    conn: &Connection,
    transcript: &str,
    course_id: i64,
) -> AttendanceOutcome {
    let roster = match db::list_students_for_course(conn, course_id) {
        Ok(r) => r,
        Err(e) => {
            log::error!("roster query failed: {}", e);
            return AttendanceOutcome::error("Attendance could not be saved");
        }
    };

    let hit = matcher::best_match(
        transcript,
        roster.iter().map(|s| (s.id, s.full_name.as_str())),
    );
    let Some((student_id, student_name)) = hit else {
        return AttendanceOutcome::error("This student is not enrolled in the course");
    };

    if let Err(e) = db::record_attendance(conn, student_id, course_id, true) {
        log::error!("attendance insert failed: {}", e);
        return AttendanceOutcome::error("Attendance could not be saved");
    }

    AttendanceOutcome {
        status: AttendanceStatus::Success,
        message: format!("Attendance recorded for {}", student_name),
        student_name: Some(student_name.to_string()),
    }
}
