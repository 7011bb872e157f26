use crate::{
    data::{
        Message,
        program::{Program, ProgramJson},
    },
    error::RegistrarResult,
    state::RegistrarState,
    store::Storage,
};
use axum::{
    Json,
    extract::{Path, State},
};

pub async fn get_programs<S: Storage>(
    State(state): State<RegistrarState<S>>,
) -> RegistrarResult<Json<Vec<ProgramJson>>> {
    let mut session = state.get_session().await?;
    let programs = Program::get_all(&mut session).await?;

    Ok(Json(programs.into_iter().map(ProgramJson::from).collect()))
}

pub async fn post_program<S: Storage>(
    State(state): State<RegistrarState<S>>,
    Json(body): Json<ProgramJson>,
) -> RegistrarResult<Json<ProgramJson>> {
    let mut session = state.get_session().await?;
    let program = Program::create(&mut session, body).await?;

    Ok(Json(program.into()))
}

pub async fn get_program<S: Storage>(
    State(state): State<RegistrarState<S>>,
    Path(id): Path<String>,
) -> RegistrarResult<Json<ProgramJson>> {
    let mut session = state.get_session().await?;
    let program = Program::get_by_id(&mut session, &id).await?;

    Ok(Json(program.into()))
}

pub async fn put_program<S: Storage>(
    State(state): State<RegistrarState<S>>,
    Path(id): Path<String>,
    Json(body): Json<ProgramJson>,
) -> RegistrarResult<Json<ProgramJson>> {
    let mut session = state.get_session().await?;
    let program = Program::update(&mut session, &id, body).await?;

    Ok(Json(program.into()))
}

pub async fn delete_program<S: Storage>(
    State(state): State<RegistrarState<S>>,
    Path(id): Path<String>,
) -> RegistrarResult<Json<Message>> {
    let mut session = state.get_session().await?;
    Program::remove(&mut session, &id).await?;

    Ok(Json(Message {
        message: "Carrera eliminada",
    }))
}
