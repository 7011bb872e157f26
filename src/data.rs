use serde::Serialize;

pub mod program;
pub mod student;

/// Body returned by the delete endpoints.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Message {
    pub message: &'static str,
}
