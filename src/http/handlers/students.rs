use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::response::Redirect;

use crate::db::{self, StoreError};
use crate::http::error::{redirect_err, redirect_ok};
use crate::http::types::AppState;
use crate::media::MediaError;

/// Multipart enrollment: text fields plus the required photo. The photo is
/// stored before the student row is inserted, so a failed insert leaves the
/// file behind on disk; that asymmetry is intentional.
pub async fn add_student(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Redirect {
    let mut full_name: Option<String> = None;
    let mut student_number: Option<String> = None;
    let mut course_id: Option<i64> = None;
    let mut photo: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                log::warn!("multipart read failed: {}", e);
                return redirect_err("Photo upload failed");
            }
        };
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("tam_adi") => full_name = field.text().await.ok(),
            Some("ogrenci_numarasi") => student_number = field.text().await.ok(),
            Some("ders_id") => {
                course_id = field.text().await.ok().and_then(|s| s.trim().parse().ok())
            }
            Some("foto") => {
                let file_name = field.file_name().unwrap_or("").to_string();
                match field.bytes().await {
                    Ok(bytes) => photo = Some((file_name, bytes.to_vec())),
                    Err(e) => {
                        log::warn!("photo read failed: {}", e);
                        return redirect_err("Photo upload failed");
                    }
                }
            }
            _ => {}
        }
    }

    let stored = match photo
        .ok_or(MediaError::Missing)
        .and_then(|(name, bytes)| state.media.save(&name, &bytes))
    {
        Ok(p) => p,
        Err(MediaError::Missing) => return redirect_err("No photo was uploaded"),
        Err(MediaError::EmptyFilename) => return redirect_err("No photo was selected"),
        Err(MediaError::BadExtension(_)) => return redirect_err("Invalid file extension"),
        Err(e) => {
            log::error!("photo store failed: {}", e);
            return redirect_err("Photo could not be stored");
        }
    };

    let Some(full_name) = full_name else {
        return redirect_err("Please enter the student's name");
    };
    let Some(course_id) = course_id else {
        return redirect_err("Please choose a course");
    };

    let conn = match db::connect(&state.config.db_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("store open failed: {}", e);
            return redirect_err("Student could not be saved");
        }
    };

    match db::add_student(
        &conn,
        &full_name,
        student_number.as_deref(),
        &stored.to_string_lossy(),
        course_id,
    ) {
        Ok(_) => redirect_ok("Student added"),
        Err(StoreError::Validation(_)) => redirect_err("Please enter the student's name"),
        Err(e) => {
            log::error!("student insert failed: {}", e);
            redirect_err("Student could not be saved")
        }
    }
}

pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
) -> Redirect {
    let conn = match db::connect(&state.config.db_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("store open failed: {}", e);
            return redirect_err("Student could not be deleted");
        }
    };
    match db::delete_student(&conn, student_id) {
        Ok(()) => redirect_ok("Student deleted"),
        Err(e) => {
            log::error!("student delete failed: {}", e);
            redirect_err("Student could not be deleted")
        }
    }
}

pub async fn remove_from_course(
    State(state): State<Arc<AppState>>,
    Path((student_id, course_id)): Path<(i64, i64)>,
) -> Redirect {
    let conn = match db::connect(&state.config.db_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("store open failed: {}", e);
            return redirect_err("Student could not be removed from the course");
        }
    };
    match db::remove_student_from_course(&conn, student_id, course_id) {
        Ok(()) => redirect_ok("Student removed from the course"),
        Err(e) => {
            log::error!("scoped student delete failed: {}", e);
            redirect_err("Student could not be removed from the course")
        }
    }
}
