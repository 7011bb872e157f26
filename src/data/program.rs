use crate::{
    error::{MissingProgramSnafu, RegistrarResult},
    store::StorageSession,
};
use serde::{Deserialize, Serialize};
use snafu::OptionExt;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Program {
    #[sqlx(rename = "id_carrera")]
    pub id: String,
    #[sqlx(rename = "nombre_carrera")]
    pub name: String,
}

/// Wire shape of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramJson {
    pub id_carrera: String,
    pub nombre_carrera: String,
}

impl From<Program> for ProgramJson {
    fn from(Program { id, name }: Program) -> Self {
        Self {
            id_carrera: id,
            nombre_carrera: name,
        }
    }
}

impl From<ProgramJson> for Program {
    fn from(
        ProgramJson {
            id_carrera,
            nombre_carrera,
        }: ProgramJson,
    ) -> Self {
        Self {
            id: id_carrera,
            name: nombre_carrera,
        }
    }
}

impl Program {
    pub async fn get_all(session: &mut impl StorageSession) -> RegistrarResult<Vec<Self>> {
        session.all_programs().await
    }

    pub async fn get_by_id(session: &mut impl StorageSession, id: &str) -> RegistrarResult<Self> {
        session
            .program_by_id(id)
            .await?
            .context(MissingProgramSnafu { id })
    }

    /// Duplicate ids are left to the storage layer to reject.
    pub async fn create(
        session: &mut impl StorageSession,
        to_be_added: ProgramJson,
    ) -> RegistrarResult<Self> {
        let program = Self::from(to_be_added);
        session.insert_program(&program).await?;
        info!(id = %program.id, "Created program");

        Self::get_by_id(session, &program.id).await
    }

    /// Only the name is replaced, the id in `body` is not looked at.
    pub async fn update(
        session: &mut impl StorageSession,
        id: &str,
        body: ProgramJson,
    ) -> RegistrarResult<Self> {
        let mut program = Self::get_by_id(session, id).await?;
        program.name = body.nombre_carrera;
        session.update_program(&program).await?;
        debug!(%id, "Updated program");

        Self::get_by_id(session, id).await
    }

    /// Students still pointing at this program are left alone.
    pub async fn remove(session: &mut impl StorageSession, id: &str) -> RegistrarResult<()> {
        let program = Self::get_by_id(session, id).await?;
        session.remove_program(&program.id).await?;
        info!(%id, "Removed program");
        Ok(())
    }
}
