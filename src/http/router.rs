use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use super::handlers;
use super::types::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::pages::index))
        .route("/ders_ekle", post(handlers::courses::add_course))
        .route("/ogrenci_ekle", post(handlers::students::add_student))
        .route(
            "/ogrenci_sil/:student_id",
            get(handlers::students::delete_student),
        )
        .route(
            "/ogrenciyi_dersten_sil/:student_id/:course_id",
            get(handlers::students::remove_from_course),
        )
        .route("/yoklama_al", post(handlers::attendance::take_attendance))
        .route(
            "/rapor_olustur/:course_id",
            get(handlers::reports::generate_report),
        )
        .route("/uploads/:name", get(handlers::assets::photo))
        .fallback(handlers::pages::not_found)
        .with_state(state)
}
