use crate::{
    data::program::Program,
    error::{
        MalformedDateSnafu, MissingStudentSnafu, ParseDateSnafu, RegistrarError, RegistrarResult,
    },
    store::StorageSession,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt, ensure};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Student {
    #[sqlx(rename = "id_estudiante")]
    pub id: String,
    #[sqlx(rename = "nombre")]
    pub name: String,
    #[sqlx(rename = "fecha_nacimiento")]
    pub birth_date: NaiveDate,
    pub email: String,
    #[sqlx(rename = "id_carrera")]
    pub program_id: String,
}

/// Wire shape of a student, with the birth date kept as a `YYYY-MM-DD` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentJson {
    pub id_estudiante: String,
    pub nombre: String,
    pub fecha_nacimiento: String,
    pub email: String,
    pub id_carrera: String,
}

/// Requires exactly four year digits, then leaves month and day to chrono.
pub fn parse_birth_date(raw: String) -> RegistrarResult<NaiveDate> {
    let four_digit_year = raw
        .as_bytes()
        .get(..5)
        .is_some_and(|head| head[..4].iter().all(u8::is_ascii_digit) && head[4] == b'-');
    ensure!(four_digit_year, MalformedDateSnafu { original: &raw });

    NaiveDate::parse_from_str(&raw, DATE_FORMAT).context(ParseDateSnafu { original: raw })
}

impl From<Student> for StudentJson {
    fn from(
        Student {
            id,
            name,
            birth_date,
            email,
            program_id,
        }: Student,
    ) -> Self {
        Self {
            id_estudiante: id,
            nombre: name,
            fecha_nacimiento: birth_date.format(DATE_FORMAT).to_string(),
            email,
            id_carrera: program_id,
        }
    }
}

impl TryFrom<StudentJson> for Student {
    type Error = RegistrarError;

    fn try_from(
        StudentJson {
            id_estudiante,
            nombre,
            fecha_nacimiento,
            email,
            id_carrera,
        }: StudentJson,
    ) -> RegistrarResult<Self> {
        Ok(Self {
            id: id_estudiante,
            name: nombre,
            birth_date: parse_birth_date(fecha_nacimiento)?,
            email,
            program_id: id_carrera,
        })
    }
}

impl Student {
    pub async fn get_all(session: &mut impl StorageSession) -> RegistrarResult<Vec<Self>> {
        session.all_students().await
    }

    pub async fn get_by_id(session: &mut impl StorageSession, id: &str) -> RegistrarResult<Self> {
        session
            .student_by_id(id)
            .await?
            .context(MissingStudentSnafu { id })
    }

    /// Fails with [`RegistrarError::MissingProgram`] without inserting anything when the
    /// referenced program doesn't exist.
    pub async fn create(
        session: &mut impl StorageSession,
        to_be_added: StudentJson,
    ) -> RegistrarResult<Self> {
        let student = Self::try_from(to_be_added)?;
        Program::get_by_id(session, &student.program_id).await?;

        session.insert_student(&student).await?;
        info!(id = %student.id, program = %student.program_id, "Created student");
        Ok(student)
    }

    /// Replaces every field but the id.
    ///
    /// Unlike [`Student::create`], the new program id is stored without checking that the
    /// program exists.
    pub async fn update(
        session: &mut impl StorageSession,
        id: &str,
        body: StudentJson,
    ) -> RegistrarResult<Self> {
        let mut student = Self::get_by_id(session, id).await?;

        let StudentJson {
            nombre,
            fecha_nacimiento,
            email,
            id_carrera,
            ..
        } = body;
        student.name = nombre;
        student.birth_date = parse_birth_date(fecha_nacimiento)?;
        student.email = email;
        student.program_id = id_carrera;

        session.update_student(&student).await?;
        debug!(%id, "Updated student");

        Self::get_by_id(session, id).await
    }

    pub async fn remove(session: &mut impl StorageSession, id: &str) -> RegistrarResult<()> {
        let student = Self::get_by_id(session, id).await?;
        session.remove_student(&student.id).await?;
        info!(%id, "Removed student");
        Ok(())
    }
}
