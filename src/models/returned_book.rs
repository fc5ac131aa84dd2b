use serde::{Deserialize, Serialize};

/// Snapshot taken when a book comes back. Never edited once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnedBook {
    pub title: String,
    pub borrowed_by: String,
    pub student_id: String,
    pub returned_at: String, // locale-formatted, see Config::returned_at_format
}
