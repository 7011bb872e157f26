use crate::{
    routes::{
        programs::{delete_program, get_program, get_programs, post_program, put_program},
        students::{delete_student, get_student, get_students, post_student, put_student},
    },
    state::RegistrarState,
    store::Storage,
};
use axum::{Router, routing::get};
use tower_http::{compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

pub mod programs;
pub mod students;

const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn build_router<S: Storage>(state: RegistrarState<S>) -> Router {
    Router::new()
        .route(
            "/estudiantes",
            get(get_students::<S>).post(post_student::<S>),
        )
        .route(
            "/estudiantes/{id}",
            get(get_student::<S>)
                .put(put_student::<S>)
                .delete(delete_student::<S>),
        )
        .route("/carreras", get(get_programs::<S>).post(post_program::<S>))
        .route(
            "/carreras/{id}",
            get(get_program::<S>)
                .put(put_program::<S>)
                .delete(delete_program::<S>),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
