//! In-process `StudentStore` with the same uniqueness rules as the table.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, StudentStore};
use crate::model::{NewStudent, Student, StudentFilter, StudentInput};

const EMAIL_INDEX: &str = "ix_students_email";
const CODE_INDEX: &str = "ix_students_enrollment_code";

#[derive(Default)]
struct Table {
    rows: Vec<Student>,
    next_id: i32,
}

impl Table {
    /// Index name of the first unique column `candidate` would collide on.
    fn collision(&self, candidate: &Student) -> Option<&'static str> {
        let others = self.rows.iter().filter(|r| r.id != candidate.id);
        for row in others {
            if row.email == candidate.email {
                return Some(EMAIL_INDEX);
            }
            if row.enrollment_code == candidate.enrollment_code {
                return Some(CODE_INDEX);
            }
        }
        None
    }
}

/// Backing store for tests and local runs without PostgreSQL.
#[derive(Default)]
pub struct MemoryStudentStore {
    table: RwLock<Table>,
    failure: std::sync::RwLock<Option<String>>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `message` (`None` restores service).
    pub fn set_failure(&self, message: Option<&str>) {
        let mut guard = self.failure.write().unwrap_or_else(|e| e.into_inner());
        *guard = message.map(str::to_string);
    }

    fn check(&self) -> Result<(), StoreError> {
        let guard = self.failure.read().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn list(&self, filter: &StudentFilter) -> Result<Vec<Student>, StoreError> {
        self.check()?;
        let table = self.table.read().await;
        let mut rows: Vec<Student> = table.rows.iter().filter(|s| filter.matches(s)).cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn find(&self, id: i32) -> Result<Option<Student>, StoreError> {
        self.check()?;
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, student: &NewStudent) -> Result<Student, StoreError> {
        self.check()?;
        let mut table = self.table.write().await;
        let row = Student {
            id: table.next_id + 1,
            enrollment_code: student.enrollment_code.clone(),
            name: student.input.name.clone(),
            email: student.input.email.clone(),
            age: student.input.age,
            enrollment_date: student.enrollment_date,
        };
        if let Some(index) = table.collision(&row) {
            return Err(StoreError::UniqueViolation {
                constraint: index.to_string(),
            });
        }
        table.next_id = row.id;
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, input: &StudentInput) -> Result<Option<Student>, StoreError> {
        self.check()?;
        let mut table = self.table.write().await;
        let Some(current) = table.rows.iter().find(|s| s.id == id).cloned() else {
            return Ok(None);
        };
        let updated = Student {
            name: input.name.clone(),
            email: input.email.clone(),
            age: input.age,
            ..current
        };
        if let Some(index) = table.collision(&updated) {
            return Err(StoreError::UniqueViolation {
                constraint: index.to_string(),
            });
        }
        if let Some(slot) = table.rows.iter_mut().find(|s| s.id == id) {
            *slot = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<Option<Student>, StoreError> {
        self.check()?;
        let mut table = self.table.write().await;
        let position = table.rows.iter().position(|s| s.id == id);
        Ok(position.map(|i| table.rows.remove(i)))
    }

    async fn last_code_with_prefix(&self, prefix: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .map(|s| &s.enrollment_code)
            .filter(|code| code.starts_with(prefix))
            .max()
            .cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}
