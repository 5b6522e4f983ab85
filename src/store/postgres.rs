//! `StudentStore` over a PostgreSQL pool.

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use super::{StoreError, StudentStore};
use crate::model::{NewStudent, Student, StudentFilter, StudentInput};
use crate::sql::{self, BindValue};

#[derive(Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        PgStudentStore { pool }
    }
}

fn bind<'q>(
    query: QueryAs<'q, Postgres, Student, PgArguments>,
    value: &BindValue,
) -> QueryAs<'q, Postgres, Student, PgArguments> {
    match value {
        BindValue::Text(s) => query.bind(s.clone()),
        BindValue::Int(n) => query.bind(*n),
    }
}

/// Unique violations are surfaced separately so callers can report a conflict.
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation {
                constraint: db_err.constraint().unwrap_or_default().to_string(),
            };
        }
    }
    StoreError::Db(err)
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn list(&self, filter: &StudentFilter) -> Result<Vec<Student>, StoreError> {
        let q = sql::select_list(filter);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, Student>(&q.sql);
        for p in &q.params {
            query = bind(query, p);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn find(&self, id: i32) -> Result<Option<Student>, StoreError> {
        let sql = sql::select_by_id();
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, student: &NewStudent) -> Result<Student, StoreError> {
        let sql = sql::insert();
        tracing::debug!(sql = %sql, code = %student.enrollment_code, "query");
        sqlx::query_as::<_, Student>(&sql)
            .bind(&student.enrollment_code)
            .bind(&student.input.name)
            .bind(&student.input.email)
            .bind(student.input.age)
            .bind(student.enrollment_date)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn update(&self, id: i32, input: &StudentInput) -> Result<Option<Student>, StoreError> {
        let sql = sql::update();
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.age)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn delete(&self, id: i32) -> Result<Option<Student>, StoreError> {
        let sql = sql::delete();
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn last_code_with_prefix(&self, prefix: &str) -> Result<Option<String>, StoreError> {
        let sql = sql::select_last_code();
        tracing::debug!(sql = %sql, prefix, "query");
        let row: Option<(String,)> = sqlx::query_as(&sql)
            .bind(prefix)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(code,)| code))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
