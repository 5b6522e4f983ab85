//! Student registry: a REST backend for student enrollment records on PostgreSQL.

pub mod clock;
pub mod config;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use migration::{apply_migrations, ensure_database_exists};
pub use model::{NewStudent, Student, StudentFilter, StudentInput};
pub use response::Envelope;
pub use routes::{app, common_routes, student_routes};
pub use service::StudentService;
pub use state::AppState;
pub use store::{MemoryStudentStore, PgStudentStore, StoreError, StudentStore};
