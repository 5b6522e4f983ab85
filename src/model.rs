//! Student record and the shapes that flow into the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i32,
    #[schema(example = "20260001")]
    pub enrollment_code: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = 27)]
    pub age: i32,
    pub enrollment_date: DateTime<Utc>,
}

/// The client-settable fields, already validated.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, ToSchema)]
pub struct StudentInput {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = 27)]
    pub age: i32,
}

/// A row about to be inserted; code and date are assigned by the server.
#[derive(Clone, Debug)]
pub struct NewStudent {
    pub enrollment_code: String,
    pub input: StudentInput,
    pub enrollment_date: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StudentFilter {
    /// Substring the name must contain.
    pub name: Option<String>,
    /// Minimum age, inclusive. An empty value imposes no constraint.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_age: Option<i32>,
}

/// Query values arrive as text: `minAge=` and `minAge=%20` mean "no filter",
/// anything else must parse as an integer.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("minAge must be an integer, got '{}'", raw))),
        _ => Ok(None),
    }
}

impl StudentFilter {
    /// Empty or whitespace-only names impose no constraint.
    pub fn name_fragment(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }

    pub fn matches(&self, student: &Student) -> bool {
        if let Some(fragment) = self.name_fragment() {
            if !student.name.contains(fragment) {
                return false;
            }
        }
        if let Some(min) = self.min_age {
            if student.age < min {
                return false;
            }
        }
        true
    }
}
