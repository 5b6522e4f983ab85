//! Student CRUD handlers: list, read, create, update, delete.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};
use tracing::{field, instrument, Span};

use crate::error::AppError;
use crate::model::StudentFilter;
use crate::response::{success_message, success_ok, Envelope};
use crate::service::{removal_message, StudentService};
use crate::state::AppState;

pub const STUDENTS_PATH: &str = "/students";

/// Unwrap the path id and record it on the handler span.
fn parse_id(id: Result<Path<i32>, PathRejection>) -> Result<i32, AppError> {
    let Path(id) = id.map_err(|e| AppError::BadRequest(format!("invalid id: {}", e.body_text())))?;
    Span::current().record("id", id);
    Ok(id)
}

fn body_to_map(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    match body {
        Ok(Json(Value::Object(m))) => Ok(m),
        Ok(_) => Err(AppError::Validation(vec!["body must be a JSON object".into()])),
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => Err(AppError::PayloadTooLarge),
        Err(e) => Err(AppError::Validation(vec![e.body_text()])),
    }
}

/// List students, optionally filtered by name substring and minimum age.
#[utoipa::path(
    get,
    path = "/students",
    params(StudentFilter),
    responses(
        (status = 200, description = "Matching students sorted by name", body = crate::doc::EnvelopeSchema),
        (status = 400, description = "Unparsable query", body = crate::doc::EnvelopeSchema),
        (status = 500, description = "Storage failure", body = crate::doc::EnvelopeSchema)
    ),
    tag = "students"
)]
#[instrument(skip(state, filter))]
pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<StudentFilter>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(filter) = filter.map_err(|e| AppError::BadRequest(e.body_text()))?;
    tracing::debug!(?filter, "listing students");
    let students = StudentService::list(state.store.as_ref(), &filter).await?;
    Ok(success_ok(students))
}

#[utoipa::path(
    get,
    path = "/students/{id}",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "The student", body = crate::doc::EnvelopeSchema),
        (status = 404, description = "Unknown id", body = crate::doc::EnvelopeSchema),
        (status = 500, description = "Storage failure", body = crate::doc::EnvelopeSchema)
    ),
    tag = "students"
)]
#[instrument(skip(state, id), fields(id = field::Empty))]
pub async fn read(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(id)?;
    let student = StudentService::get(state.store.as_ref(), id).await?;
    Ok(success_ok(student))
}

/// Create a student. The enrollment code, id and enrollment date are assigned by the server.
#[utoipa::path(
    post,
    path = "/students",
    request_body = crate::model::StudentInput,
    responses(
        (status = 201, description = "Created", body = crate::doc::EnvelopeSchema,
            headers(("Location" = String, description = "Path of the new student"))),
        (status = 400, description = "Validation failed", body = crate::doc::EnvelopeSchema),
        (status = 409, description = "Email already registered", body = crate::doc::EnvelopeSchema),
        (status = 413, description = "Body over the configured limit", body = crate::doc::EnvelopeSchema),
        (status = 500, description = "Storage failure", body = crate::doc::EnvelopeSchema)
    ),
    tag = "students"
)]
#[instrument(skip(state, body), fields(id = field::Empty))]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let student = StudentService::create(state.store.as_ref(), state.clock.now(), body).await?;
    Span::current().record("id", student.id);
    let location = format!("{}/{}", STUDENTS_PATH, student.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(Envelope::data(student)),
    ))
}

/// Replace name, email and age of a student.
#[utoipa::path(
    put,
    path = "/students/{id}",
    params(("id" = i32, Path, description = "Student id")),
    request_body = crate::model::StudentInput,
    responses(
        (status = 200, description = "Updated", body = crate::doc::EnvelopeSchema),
        (status = 400, description = "Validation failed", body = crate::doc::EnvelopeSchema),
        (status = 404, description = "Unknown id", body = crate::doc::EnvelopeSchema),
        (status = 409, description = "Email already registered", body = crate::doc::EnvelopeSchema),
        (status = 413, description = "Body over the configured limit", body = crate::doc::EnvelopeSchema),
        (status = 500, description = "Storage failure", body = crate::doc::EnvelopeSchema)
    ),
    tag = "students"
)]
#[instrument(skip(state, id, body), fields(id = field::Empty))]
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(id)?;
    let body = body_to_map(body)?;
    let student = StudentService::update(state.store.as_ref(), id, body).await?;
    Ok(success_ok(student))
}

#[utoipa::path(
    delete,
    path = "/students/{id}",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Removed; message names the student", body = crate::doc::EnvelopeSchema),
        (status = 404, description = "Unknown id", body = crate::doc::EnvelopeSchema),
        (status = 500, description = "Storage failure", body = crate::doc::EnvelopeSchema)
    ),
    tag = "students"
)]
#[instrument(skip(state, id), fields(id = field::Empty))]
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(id)?;
    let student = StudentService::delete(state.store.as_ref(), id).await?;
    Ok(success_message(removal_message(&student)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::span::{Id, Record};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[derive(Clone, Default)]
    struct Recorded(Arc<Mutex<Vec<String>>>);

    impl Visit for Recorded {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.0.lock().unwrap().push(format!("{}={:?}", field.name(), value));
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for Recorded {
        fn on_record(&self, _: &Id, values: &Record<'_>, _: Context<'_, S>) {
            values.record(&mut self.clone());
        }
    }

    #[test]
    fn parsed_id_is_recorded_on_the_span() {
        let recorded = Recorded::default();
        let subscriber = tracing_subscriber::registry().with(recorded.clone());
        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("read", id = field::Empty);
            let _guard = span.enter();
            assert_eq!(parse_id(Ok(Path(42))).unwrap(), 42);
        });
        assert_eq!(*recorded.0.lock().unwrap(), vec!["id=42".to_string()]);
    }

    #[test]
    fn non_object_body_is_invalid_data() {
        let err = body_to_map(Ok(Json(serde_json::json!([1, 2])))).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
