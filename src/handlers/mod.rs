//! HTTP handlers for the student operations.

pub mod students;
