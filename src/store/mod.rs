//! Data-access layer: the `StudentStore` contract and its adapters.

mod memory;
mod postgres;

pub use memory::MemoryStudentStore;
pub use postgres::PgStudentStore;

use crate::model::{NewStudent, Student, StudentFilter, StudentInput};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Reads never mutate; writes either apply completely or fail.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// All rows matching `filter`, ordered by name.
    async fn list(&self, filter: &StudentFilter) -> Result<Vec<Student>, StoreError>;

    async fn find(&self, id: i32) -> Result<Option<Student>, StoreError>;

    /// Insert and return the stored row with its generated id.
    async fn insert(&self, student: &NewStudent) -> Result<Student, StoreError>;

    /// Overwrite name, email and age. `None` if no row has this id.
    async fn update(&self, id: i32, input: &StudentInput) -> Result<Option<Student>, StoreError>;

    /// Remove and return the row. `None` if no row has this id.
    async fn delete(&self, id: i32) -> Result<Option<Student>, StoreError>;

    /// Greatest enrollment code (as text) starting with `prefix`.
    async fn last_code_with_prefix(&self, prefix: &str) -> Result<Option<String>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
