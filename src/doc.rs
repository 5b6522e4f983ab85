//! OpenAPI document for the student API, served as JSON by the router.

use utoipa::{OpenApi, ToSchema};

/// OpenAPI schema for [`crate::response::Envelope`].
///
/// `data` holds a student, a list of students, or is absent.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct EnvelopeSchema {
    success: bool,
    #[schema(value_type = Option<Object>)]
    data: Option<serde_json::Value>,
    #[schema(example = "Student not found")]
    error: Option<String>,
    #[schema(example = json!(["age must be between 18 and 100"]))]
    details: Option<Vec<String>>,
    message: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Student registry API",
        description = "Create, list, update and remove students. Enrollment codes are assigned by the server."
    ),
    paths(
        crate::handlers::students::list,
        crate::handlers::students::read,
        crate::handlers::students::create,
        crate::handlers::students::update,
        crate::handlers::students::delete,
    ),
    components(schemas(EnvelopeSchema, crate::model::Student, crate::model::StudentInput)),
    tags(
        (name = "students", description = "Student records")
    )
)]
pub struct ApiDoc;
