//! Route table for the records API

use super::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route(
            "/patients/:id",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .route("/patients/:id/exams", get(handlers::list_patient_exams))
        .route(
            "/exams",
            get(handlers::list_exams).post(handlers::create_exam),
        )
        .route(
            "/exams/:id",
            get(handlers::get_exam).delete(handlers::delete_exam),
        )
}
