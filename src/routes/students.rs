use crate::{
    data::{
        Message,
        student::{Student, StudentJson},
    },
    error::RegistrarResult,
    state::RegistrarState,
    store::Storage,
};
use axum::{
    Json,
    extract::{Path, State},
};

pub const CREATED_MESSAGE: &str = "Estudiante creado con éxito!";

pub async fn get_students<S: Storage>(
    State(state): State<RegistrarState<S>>,
) -> RegistrarResult<Json<Vec<StudentJson>>> {
    let mut session = state.get_session().await?;
    let students = Student::get_all(&mut session).await?;

    Ok(Json(students.into_iter().map(StudentJson::from).collect()))
}

//the created record isn't echoed back, only a confirmation string
pub async fn post_student<S: Storage>(
    State(state): State<RegistrarState<S>>,
    Json(body): Json<StudentJson>,
) -> RegistrarResult<Json<&'static str>> {
    let mut session = state.get_session().await?;
    Student::create(&mut session, body).await?;

    Ok(Json(CREATED_MESSAGE))
}

pub async fn get_student<S: Storage>(
    State(state): State<RegistrarState<S>>,
    Path(id): Path<String>,
) -> RegistrarResult<Json<StudentJson>> {
    let mut session = state.get_session().await?;
    let student = Student::get_by_id(&mut session, &id).await?;

    Ok(Json(student.into()))
}

pub async fn put_student<S: Storage>(
    State(state): State<RegistrarState<S>>,
    Path(id): Path<String>,
    Json(body): Json<StudentJson>,
) -> RegistrarResult<Json<StudentJson>> {
    let mut session = state.get_session().await?;
    let student = Student::update(&mut session, &id, body).await?;

    Ok(Json(student.into()))
}

pub async fn delete_student<S: Storage>(
    State(state): State<RegistrarState<S>>,
    Path(id): Path<String>,
) -> RegistrarResult<Json<Message>> {
    let mut session = state.get_session().await?;
    Student::remove(&mut session, &id).await?;

    Ok(Json(Message {
        message: "Estudiante eliminado",
    }))
}
