use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A registered student. `enrolled_photo_ref` points at the reference image
/// the verification oracle compares captured photos against.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Student {
    pub id: String,
    pub student_number: String,
    pub full_name: String,
    pub enrolled_photo_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
