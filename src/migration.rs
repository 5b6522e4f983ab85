//! Startup schema application for the students table.
//! Every step is idempotent, so it runs on each boot.

use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

use crate::store::StoreError;

/// Ordered DDL steps. The enrollment-code column arrived after the table, so it
/// is added separately for databases created before it existed.
pub const STEPS: &[(&str, &str)] = &[
    (
        "create_students",
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id SERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            email VARCHAR(255) NOT NULL,
            age INTEGER NOT NULL,
            enrollment_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "add_enrollment_code",
        "ALTER TABLE students ADD COLUMN IF NOT EXISTS enrollment_code VARCHAR(20) NOT NULL DEFAULT ''",
    ),
    (
        "index_email",
        "CREATE UNIQUE INDEX IF NOT EXISTS ix_students_email ON students (email)",
    ),
    (
        "index_enrollment_code",
        "CREATE UNIQUE INDEX IF NOT EXISTS ix_students_enrollment_code ON students (enrollment_code)",
    ),
];

pub async fn apply_migrations(pool: &PgPool) -> Result<(), StoreError> {
    for (name, ddl) in STEPS {
        tracing::info!(step = %name, "applying schema step");
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Connect to the server's `postgres` database and create the target database if it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin, db_name) = admin_target(database_url)?;
    let Some(db_name) = db_name else {
        return Ok(());
    };
    let mut conn = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Options for the `postgres` maintenance database on the same server, plus the
/// target database name. `None` when the URL names no database or names `postgres`.
fn admin_target(database_url: &str) -> Result<(PgConnectOptions, Option<String>), sqlx::Error> {
    let opts = PgConnectOptions::from_str(database_url)?;
    let db_name = opts
        .get_database()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "postgres")
        .map(str::to_owned);
    Ok((opts.database("postgres"), db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
