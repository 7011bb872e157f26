use crate::{
    data::{program::Program, student::Student},
    error::RegistrarResult,
};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

/// Hands out one [`StorageSession`] per request.
///
/// Handlers only ever see this trait, so the backing store can be swapped for the in-memory one.
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    type Session: StorageSession;

    async fn open_session(&self) -> RegistrarResult<Self::Session>;

    /// Called once on the way out of the process.
    async fn close(&self);
}

/// Single-table reads and writes. Dropping the session releases whatever it holds.
///
/// Writes trust their input: existence checks live in [`Program`] and [`Student`].
#[async_trait]
pub trait StorageSession: Send {
    async fn all_programs(&mut self) -> RegistrarResult<Vec<Program>>;
    async fn program_by_id(&mut self, id: &str) -> RegistrarResult<Option<Program>>;
    async fn insert_program(&mut self, program: &Program) -> RegistrarResult<()>;
    async fn update_program(&mut self, program: &Program) -> RegistrarResult<()>;
    async fn remove_program(&mut self, id: &str) -> RegistrarResult<()>;

    async fn all_students(&mut self) -> RegistrarResult<Vec<Student>>;
    async fn student_by_id(&mut self, id: &str) -> RegistrarResult<Option<Student>>;
    async fn insert_student(&mut self, student: &Student) -> RegistrarResult<()>;
    async fn update_student(&mut self, student: &Student) -> RegistrarResult<()>;
    async fn remove_student(&mut self, id: &str) -> RegistrarResult<()>;
}
