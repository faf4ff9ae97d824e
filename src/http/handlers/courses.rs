use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;

use crate::db::{self, StoreError};
use crate::http::error::{redirect_err, redirect_ok};
use crate::http::types::AppState;

#[derive(Debug, Deserialize)]
pub struct AddCourseForm {
    pub ders_adi: String,
}

pub async fn add_course(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddCourseForm>,
) -> Redirect {
    let conn = match db::connect(&state.config.db_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("store open failed: {}", e);
            return redirect_err("Course could not be saved");
        }
    };

    match db::add_course(&conn, &form.ders_adi) {
        Ok(_) => redirect_ok("Course added"),
        Err(StoreError::Validation(_)) => redirect_err("Please enter a course name"),
        Err(e) => {
            log::error!("course insert failed: {}", e);
            redirect_err("Course could not be saved")
        }
    }
}
