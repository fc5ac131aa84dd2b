use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const STATUS_AVAILABLE: &str = "Available";
pub const STATUS_BORROWED: &str = "Borrowed";

/// Book record exactly as it is laid out in the `books` JSON array
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub status: String, // 'Available', 'Borrowed'
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrowed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

/// Lending state of a book. Borrower details only exist while borrowed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookStatus {
    Available,
    Borrowed {
        borrowed_by: String,
        student_id: String,
    },
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => STATUS_AVAILABLE,
            BookStatus::Borrowed { .. } => STATUS_BORROWED,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub image: Option<String>,
    pub status: BookStatus,
}

impl Book {
    pub fn is_available(&self) -> bool {
        matches!(self.status, BookStatus::Available)
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self.status, BookStatus::Borrowed { .. })
    }
}

impl TryFrom<Model> for Book {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = match model.status.as_str() {
            STATUS_AVAILABLE => {
                // Returned books may still carry explicit nulls or stale values
                if model.borrowed_by.is_some() || model.student_id.is_some() {
                    tracing::warn!(
                        "Book {} is Available but carries borrower fields, dropping them",
                        model.id
                    );
                }
                BookStatus::Available
            }
            STATUS_BORROWED => match (model.borrowed_by, model.student_id) {
                (Some(borrowed_by), Some(student_id)) => BookStatus::Borrowed {
                    borrowed_by,
                    student_id,
                },
                _ => {
                    return Err(DomainError::Storage(format!(
                        "book {} is Borrowed without borrower name and student id",
                        model.id
                    )));
                }
            },
            other => {
                return Err(DomainError::Storage(format!(
                    "book {} has unknown status '{}'",
                    model.id, other
                )));
            }
        };

        Ok(Self {
            id: model.id,
            title: model.title,
            author: model.author,
            image: model.image,
            status,
        })
    }
}

impl From<Book> for Model {
    fn from(book: Book) -> Self {
        let status = book.status.as_str().to_string();
        let (borrowed_by, student_id) = match book.status {
            BookStatus::Available => (None, None),
            BookStatus::Borrowed {
                borrowed_by,
                student_id,
            } => (Some(borrowed_by), Some(student_id)),
        };

        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            image: book.image,
            status,
            borrowed_by,
            student_id,
        }
    }
}
