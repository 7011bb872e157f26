//! In-process tables with the same key and width rules as the SQL schema.

use crate::{
    data::{program::Program, student::Student},
    error::{DuplicateKeySnafu, RegistrarResult, ValueTooLongSnafu},
    store::{Storage, StorageSession},
};
use async_trait::async_trait;
use snafu::ensure;
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

const ID_WIDTH: usize = 12;
const TEXT_WIDTH: usize = 100;

#[derive(Debug, Default)]
struct Tables {
    programs: BTreeMap<String, Program>,
    students: BTreeMap<String, Student>,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    tables: Arc<Mutex<Tables>>,
}

#[async_trait]
impl Storage for MemoryStorage {
    type Session = MemorySession;

    async fn open_session(&self) -> RegistrarResult<MemorySession> {
        Ok(MemorySession {
            tables: self.tables.clone(),
        })
    }

    async fn close(&self) {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(
            programs = tables.programs.len(),
            students = tables.students.len(),
            "Discarding in-memory tables"
        );
    }
}

#[derive(Debug)]
pub struct MemorySession {
    tables: Arc<Mutex<Tables>>,
}

impl MemorySession {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_width(column: &'static str, value: &str, max: usize) -> RegistrarResult<()> {
    ensure!(value.chars().count() <= max, ValueTooLongSnafu { column, max });
    Ok(())
}

fn check_program(program: &Program) -> RegistrarResult<()> {
    check_width("id_carrera", &program.id, ID_WIDTH)?;
    check_width("nombre_carrera", &program.name, TEXT_WIDTH)
}

fn check_student(student: &Student) -> RegistrarResult<()> {
    check_width("id_estudiante", &student.id, ID_WIDTH)?;
    check_width("nombre", &student.name, TEXT_WIDTH)?;
    check_width("email", &student.email, TEXT_WIDTH)?;
    check_width("id_carrera", &student.program_id, ID_WIDTH)
}

#[async_trait]
impl StorageSession for MemorySession {
    async fn all_programs(&mut self) -> RegistrarResult<Vec<Program>> {
        Ok(self.tables().programs.values().cloned().collect())
    }

    async fn program_by_id(&mut self, id: &str) -> RegistrarResult<Option<Program>> {
        Ok(self.tables().programs.get(id).cloned())
    }

    async fn insert_program(&mut self, program: &Program) -> RegistrarResult<()> {
        check_program(program)?;
        let mut tables = self.tables();
        ensure!(
            !tables.programs.contains_key(&program.id),
            DuplicateKeySnafu {
                table: "carreras",
                id: &program.id
            }
        );
        tables.programs.insert(program.id.clone(), program.clone());
        Ok(())
    }

    async fn update_program(&mut self, program: &Program) -> RegistrarResult<()> {
        check_program(program)?;
        if let Some(existing) = self.tables().programs.get_mut(&program.id) {
            existing.clone_from(program);
        }
        Ok(())
    }

    async fn remove_program(&mut self, id: &str) -> RegistrarResult<()> {
        self.tables().programs.remove(id);
        Ok(())
    }

    async fn all_students(&mut self) -> RegistrarResult<Vec<Student>> {
        Ok(self.tables().students.values().cloned().collect())
    }

    async fn student_by_id(&mut self, id: &str) -> RegistrarResult<Option<Student>> {
        Ok(self.tables().students.get(id).cloned())
    }

    async fn insert_student(&mut self, student: &Student) -> RegistrarResult<()> {
        check_student(student)?;
        let mut tables = self.tables();
        ensure!(
            !tables.students.contains_key(&student.id),
            DuplicateKeySnafu {
                table: "estudiantes",
                id: &student.id
            }
        );
        tables.students.insert(student.id.clone(), student.clone());
        Ok(())
    }

    async fn update_student(&mut self, student: &Student) -> RegistrarResult<()> {
        check_student(student)?;
        if let Some(existing) = self.tables().students.get_mut(&student.id) {
            existing.clone_from(student);
        }
        Ok(())
    }

    async fn remove_student(&mut self, id: &str) -> RegistrarResult<()> {
        self.tables().students.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistrarError;
    use chrono::NaiveDate;

    fn student(id: &str) -> Student {
        Student {
            id: id.into(),
            name: "Ana".into(),
            birth_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            email: "a@x.com".into(),
            program_id: "ING01".into(),
        }
    }

    #[tokio::test]
    async fn sessions_share_the_same_tables() {
        let storage = MemoryStorage::default();
        let mut writer = storage.open_session().await.unwrap();
        let mut reader = storage.open_session().await.unwrap();

        writer.insert_student(&student("E001")).await.unwrap();

        assert_eq!(
            reader.student_by_id("E001").await.unwrap(),
            Some(student("E001"))
        );
    }

    #[tokio::test]
    async fn duplicate_keys_are_rejected() {
        let mut session = MemoryStorage::default().open_session().await.unwrap();
        session.insert_student(&student("E001")).await.unwrap();

        let err = session.insert_student(&student("E001")).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrarError::DuplicateKey {
                table: "estudiantes",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn column_widths_count_characters() {
        let mut session = MemoryStorage::default().open_session().await.unwrap();

        let twelve_accented = "ÁÉÍÓÚÑáéíóúñ";
        session
            .insert_program(&Program {
                id: twelve_accented.into(),
                name: "Ingeniería".into(),
            })
            .await
            .unwrap();

        let err = session
            .insert_student(&student("E0000000000001"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrarError::ValueTooLong {
                column: "id_estudiante",
                max: ID_WIDTH
            }
        ));

        let err = session
            .insert_program(&Program {
                id: "LONG".into(),
                name: "x".repeat(TEXT_WIDTH + 1),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::ValueTooLong { .. }));
    }
}
