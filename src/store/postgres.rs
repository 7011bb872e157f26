use crate::{
    config::DbConfig,
    data::{program::Program, student::Student},
    error::{
        GetDatabaseConnectionSnafu, MakeQuerySnafu, MigrateSnafu, OpenDatabaseSnafu,
        RegistrarResult,
    },
    store::{Storage, StorageSession},
};
use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{Pool, Postgres, pool::PoolConnection, postgres::PgPoolOptions};

#[derive(Clone, Debug)]
pub struct PostgresStorage {
    pool: Pool<Postgres>,
}

impl PostgresStorage {
    /// Connects and creates any missing tables.
    pub async fn new(db_config: &DbConfig) -> RegistrarResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections())
            .connect(&db_config.get_db_path())
            .await
            .context(OpenDatabaseSnafu)?;

        Self::migrated(pool).await
    }

    async fn migrated(pool: Pool<Postgres>) -> RegistrarResult<Self> {
        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    type Session = PostgresSession;

    async fn open_session(&self) -> RegistrarResult<PostgresSession> {
        let conn = self
            .pool
            .acquire()
            .await
            .context(GetDatabaseConnectionSnafu)?;
        Ok(PostgresSession { conn })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// A pooled connection, returned to the pool on drop.
#[derive(Debug)]
pub struct PostgresSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl StorageSession for PostgresSession {
    async fn all_programs(&mut self) -> RegistrarResult<Vec<Program>> {
        sqlx::query_as::<_, Program>("SELECT id_carrera, nombre_carrera FROM public.carreras")
            .fetch_all(&mut *self.conn)
            .await
            .context(MakeQuerySnafu)
    }

    async fn program_by_id(&mut self, id: &str) -> RegistrarResult<Option<Program>> {
        sqlx::query_as::<_, Program>(
            "SELECT id_carrera, nombre_carrera FROM public.carreras WHERE id_carrera = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await
        .context(MakeQuerySnafu)
    }

    async fn insert_program(&mut self, program: &Program) -> RegistrarResult<()> {
        sqlx::query("INSERT INTO public.carreras (id_carrera, nombre_carrera) VALUES ($1, $2)")
            .bind(&program.id)
            .bind(&program.name)
            .execute(&mut *self.conn)
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }

    async fn update_program(&mut self, program: &Program) -> RegistrarResult<()> {
        sqlx::query("UPDATE public.carreras SET nombre_carrera = $2 WHERE id_carrera = $1")
            .bind(&program.id)
            .bind(&program.name)
            .execute(&mut *self.conn)
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }

    async fn remove_program(&mut self, id: &str) -> RegistrarResult<()> {
        sqlx::query("DELETE FROM public.carreras WHERE id_carrera = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }

    async fn all_students(&mut self) -> RegistrarResult<Vec<Student>> {
        sqlx::query_as::<_, Student>(
            "SELECT id_estudiante, nombre, fecha_nacimiento, email, id_carrera FROM public.estudiantes",
        )
        .fetch_all(&mut *self.conn)
        .await
        .context(MakeQuerySnafu)
    }

    async fn student_by_id(&mut self, id: &str) -> RegistrarResult<Option<Student>> {
        sqlx::query_as::<_, Student>(
            "SELECT id_estudiante, nombre, fecha_nacimiento, email, id_carrera FROM public.estudiantes WHERE id_estudiante = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await
        .context(MakeQuerySnafu)
    }

    async fn insert_student(&mut self, student: &Student) -> RegistrarResult<()> {
        sqlx::query("INSERT INTO public.estudiantes (id_estudiante, nombre, fecha_nacimiento, email, id_carrera) VALUES ($1, $2, $3, $4, $5)")
            .bind(&student.id)
            .bind(&student.name)
            .bind(student.birth_date)
            .bind(&student.email)
            .bind(&student.program_id)
            .execute(&mut *self.conn)
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }

    async fn update_student(&mut self, student: &Student) -> RegistrarResult<()> {
        sqlx::query("UPDATE public.estudiantes SET nombre = $2, fecha_nacimiento = $3, email = $4, id_carrera = $5 WHERE id_estudiante = $1")
            .bind(&student.id)
            .bind(&student.name)
            .bind(student.birth_date)
            .bind(&student.email)
            .bind(&student.program_id)
            .execute(&mut *self.conn)
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }

    async fn remove_student(&mut self, id: &str) -> RegistrarResult<()> {
        sqlx::query("DELETE FROM public.estudiantes WHERE id_estudiante = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{program::ProgramJson, student::StudentJson},
        error::RegistrarError,
    };
    use sqlx::PgPool;

    fn ana() -> StudentJson {
        StudentJson {
            id_estudiante: "E001".into(),
            nombre: "Ana".into(),
            fecha_nacimiento: "2000-01-01".into(),
            email: "a@x.com".into(),
            id_carrera: "ING01".into(),
        }
    }

    fn engineering() -> ProgramJson {
        ProgramJson {
            id_carrera: "ING01".into(),
            nombre_carrera: "Ingeniería".into(),
        }
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "needs DATABASE_URL pointing at a postgres server"]
    async fn programs_with_students_can_be_removed(pool: PgPool) {
        let storage = PostgresStorage::migrated(pool).await.unwrap();
        let mut session = storage.open_session().await.unwrap();

        Program::create(&mut session, engineering()).await.unwrap();
        Student::create(&mut session, ana()).await.unwrap();
        assert_eq!(
            StudentJson::from(Student::get_by_id(&mut session, "E001").await.unwrap()),
            ana()
        );

        Program::remove(&mut session, "ING01").await.unwrap();

        let student = Student::get_by_id(&mut session, "E001").await.unwrap();
        assert_eq!(student.program_id, "ING01");
        assert!(Program::get_all(&mut session).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "needs DATABASE_URL pointing at a postgres server"]
    async fn schema_rejects_bad_rows_but_not_unknown_programs(pool: PgPool) {
        let storage = PostgresStorage::migrated(pool).await.unwrap();
        let mut session = storage.open_session().await.unwrap();
        Program::create(&mut session, engineering()).await.unwrap();

        let err = Program::create(&mut session, engineering())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::MakeQuery { .. }));

        let err = Student::create(
            &mut session,
            StudentJson {
                id_estudiante: "E0000000000001".into(),
                ..ana()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RegistrarError::MakeQuery { .. }));

        Student::create(&mut session, ana()).await.unwrap();
        let updated = Student::update(
            &mut session,
            "E001",
            StudentJson {
                id_carrera: "NOPE".into(),
                ..ana()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.program_id, "NOPE");
    }
}
