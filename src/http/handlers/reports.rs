use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Redirect;

use crate::db;
use crate::http::error::{redirect_err, redirect_ok};
use crate::http::types::AppState;
use crate::report;

/// The PDF lands in the working directory, named by course id, overwriting
/// any previous report for the same course.
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<i64>,
) -> Redirect {
    let conn = match db::connect(&state.config.db_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("store open failed: {}", e);
            return redirect_err("Report could not be created");
        }
    };

    let course_name = match db::course_name(&conn, course_id) {
        Ok(Some(name)) => name,
        Ok(None) => return redirect_err("Course not found"),
        Err(e) => {
            log::error!("course lookup failed: {}", e);
            return redirect_err("Report could not be created");
        }
    };

    let rows = match db::course_attendance_report(&conn, course_id) {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("report query failed: {}", e);
            return redirect_err("Report could not be created");
        }
    };

    match report::generate(FsPath::new("."), course_id, &course_name, &rows) {
        Ok(path) => redirect_ok(&format!(
            "Report created: {}",
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        )),
        Err(e) => {
            log::error!("report rendering failed: {}", e);
            redirect_err("Report could not be created")
        }
    }
}
