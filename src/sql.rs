//! Parameterized SQL for the students table: identifiers are fixed, values are bound.

use crate::model::StudentFilter;

pub const TABLE: &str = "students";

/// Column list in `Student` field order.
pub const COLUMNS: &str = "id, enrollment_code, name, email, age, enrollment_date";

/// A value bound to a `$n` placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Int(i32),
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// SELECT with optional conjunctive filters, ordered by name.
pub fn select_list(filter: &StudentFilter) -> QueryBuf {
    let mut q = QueryBuf::default();
    let mut conditions: Vec<String> = Vec::new();
    if let Some(fragment) = filter.name_fragment() {
        let n = q.push_param(BindValue::Text(fragment.to_string()));
        conditions.push(format!("strpos(name, ${}) > 0", n));
    }
    if let Some(min) = filter.min_age {
        let n = q.push_param(BindValue::Int(min));
        conditions.push(format!("age >= ${}", n));
    }
    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY name ASC, id ASC",
        COLUMNS, TABLE, where_clause
    );
    q
}

pub fn select_by_id() -> String {
    format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, TABLE)
}

pub fn insert() -> String {
    format!(
        "INSERT INTO {} (enrollment_code, name, email, age, enrollment_date) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        TABLE, COLUMNS
    )
}

/// Only name, email and age are ever written after creation.
pub fn update() -> String {
    format!(
        "UPDATE {} SET name = $2, email = $3, age = $4 WHERE id = $1 RETURNING {}",
        TABLE, COLUMNS
    )
}

pub fn delete() -> String {
    format!("DELETE FROM {} WHERE id = $1 RETURNING {}", TABLE, COLUMNS)
}

/// Highest code starting with the given prefix, compared as text.
pub fn select_last_code() -> String {
    format!(
        "SELECT enrollment_code FROM {} WHERE starts_with(enrollment_code, $1) ORDER BY enrollment_code DESC LIMIT 1",
        TABLE
    )
}
