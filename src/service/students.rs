//! Student operations: validation, code assignment and store calls, with
//! failures translated into `AppError`.

use chrono::{DateTime, Datelike, Utc};
use serde_json::{Map, Value};

use super::enrollment;
use super::validation::{validate, STUDENT_RULES};
use crate::error::AppError;
use crate::model::{NewStudent, Student, StudentFilter, StudentInput};
use crate::store::StudentStore;

pub struct StudentService;

impl StudentService {
    pub async fn list(store: &dyn StudentStore, filter: &StudentFilter) -> Result<Vec<Student>, AppError> {
        store
            .list(filter)
            .await
            .map_err(|e| AppError::unexpected("Error fetching students", e))
    }

    pub async fn get(store: &dyn StudentStore, id: i32) -> Result<Student, AppError> {
        store
            .find(id)
            .await
            .map_err(|e| AppError::unexpected("Error fetching student", e))?
            .ok_or_else(AppError::not_found)
    }

    /// Validate, assign the next code for `now`'s year, insert.
    pub async fn create(
        store: &dyn StudentStore,
        now: DateTime<Utc>,
        body: Map<String, Value>,
    ) -> Result<Student, AppError> {
        let input = parse_input(body)?;
        const CONTEXT: &str = "Error creating student";
        let enrollment_code = enrollment::generate(store, now.year())
            .await
            .map_err(|e| AppError::unexpected(CONTEXT, e))?;
        let new_student = NewStudent {
            enrollment_code,
            input,
            enrollment_date: now,
        };
        let student = store
            .insert(&new_student)
            .await
            .map_err(|e| AppError::from_write(CONTEXT, e))?;
        tracing::info!(id = student.id, code = %student.enrollment_code, "student created");
        Ok(student)
    }

    /// Replace name, email and age. Id, code and enrollment date are kept.
    pub async fn update(store: &dyn StudentStore, id: i32, body: Map<String, Value>) -> Result<Student, AppError> {
        let input = parse_input(body)?;
        store
            .update(id, &input)
            .await
            .map_err(|e| AppError::from_write("Error updating student", e))?
            .ok_or_else(AppError::not_found)
    }

    pub async fn delete(store: &dyn StudentStore, id: i32) -> Result<Student, AppError> {
        let student = store
            .delete(id)
            .await
            .map_err(|e| AppError::unexpected("Error deleting student", e))?
            .ok_or_else(AppError::not_found)?;
        tracing::info!(id = student.id, code = %student.enrollment_code, "student deleted");
        Ok(student)
    }
}

/// Confirmation text returned after a delete.
pub fn removal_message(student: &Student) -> String {
    format!(
        "Student '{}' (enrollment code: {}) was removed successfully",
        student.name, student.enrollment_code
    )
}

fn parse_input(body: Map<String, Value>) -> Result<StudentInput, AppError> {
    let violations = validate(&body, STUDENT_RULES);
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }
    serde_json::from_value(Value::Object(body)).map_err(|e| AppError::Validation(vec![e.to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStudentStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    fn at(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 5, 4, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_code_and_date() {
        let store = MemoryStudentStore::new();
        let s = StudentService::create(&store, at(2026), body(json!({ "name": "Ada", "email": "ada@x.io", "age": 36 })))
            .await
            .unwrap();
        assert_eq!(s.enrollment_code, "20260001");
        assert_eq!(s.enrollment_date, at(2026));
    }

    #[tokio::test]
    async fn client_cannot_choose_the_code() {
        let store = MemoryStudentStore::new();
        let s = StudentService::create(
            &store,
            at(2026),
            body(json!({ "name": "Ada", "email": "ada@x.io", "age": 36, "enrollmentCode": "19990042", "id": 99 })),
        )
        .await
        .unwrap();
        assert_eq!(s.enrollment_code, "20260001");
        assert_eq!(s.id, 1);
    }

    #[tokio::test]
    async fn invalid_payload_never_reaches_the_store() {
        let store = MemoryStudentStore::new();
        let err = StudentService::create(&store, at(2026), body(json!({ "name": "Ada", "email": "nope", "age": 12 })))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(details) => assert_eq!(details.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(store.list(&StudentFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let store = MemoryStudentStore::new();
        let err = StudentService::update(&store, 7, body(json!({ "name": "Ada", "email": "ada@x.io", "age": 36 })))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn store_failure_is_unexpected_with_context() {
        let store = MemoryStudentStore::new();
        store.set_failure(Some("connection refused"));
        let err = StudentService::list(&store, &StudentFilter::default()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error fetching students: store unavailable: connection refused"
        );
    }

    #[test]
    fn removal_message_names_the_student() {
        let s = Student {
            id: 3,
            enrollment_code: "20260003".into(),
            name: "Grace".into(),
            email: "g@x.io".into(),
            age: 40,
            enrollment_date: at(2026),
        };
        assert_eq!(
            removal_message(&s),
            "Student 'Grace' (enrollment code: 20260003) was removed successfully"
        );
    }
}
