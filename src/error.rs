use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use snafu::Snafu;
use std::num::ParseIntError;

pub type RegistrarResult<T> = Result<T, RegistrarError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RegistrarError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error getting db connection"))]
    GetDatabaseConnection { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    Migrate { source: sqlx::migrate::MigrateError },
    #[snafu(display("Row with key {:?} already exists in `{}`", id, table))]
    DuplicateKey { table: &'static str, id: String },
    #[snafu(display("Value for `{}` is longer than {} characters", column, max))]
    ValueTooLong { column: &'static str, max: usize },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Unable to parse max connection count"))]
    ParseMaxConnections { source: ParseIntError },
    #[snafu(display("Unknown storage backend {:?}, expected `postgres` or `memory`", name))]
    UnknownStorageBackend { name: String },
    #[snafu(display("Unable to parse date {:?}", original))]
    ParseDate {
        source: chrono::ParseError,
        original: String,
    },
    #[snafu(display("Date {:?} doesn't start with a four digit year", original))]
    MalformedDate { original: String },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: String },
    #[snafu(display("Unable to find program with ID: {}", id))]
    MissingProgram { id: String },
}

impl RegistrarError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingStudent { .. } | Self::MissingProgram { .. } => StatusCode::NOT_FOUND,
            //malformed dates are surfaced like any other server failure
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::MissingStudent { .. } => "Estudiante no encontrado".to_string(),
            Self::MissingProgram { .. } => "Carrera no encontrada".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for RegistrarError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        error!(?self, %status_code, "Error!");
        (status_code, Json(json!({ "detail": self.detail() }))).into_response()
    }
}
