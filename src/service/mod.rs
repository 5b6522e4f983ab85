//! Request validation, enrollment-code generation and the student operations.

pub mod enrollment;
mod students;
mod validation;
pub use students::{removal_message, StudentService};
pub use validation::{validate, FieldRule, Format, ValidationRule, STUDENT_RULES};
