//! Catalog Service - books, borrowing and return history
//!
//! Both collections live in the store as whole JSON arrays. The service keeps
//! a cached copy behind one async mutex; every operation holds the lock for
//! its full read-modify-write cycle, so two writes to the same collection can
//! never interleave. The cache is only replaced after the store accepted the
//! new value.

use chrono::format::{Item, StrftimeItems};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::DEFAULT_RETURNED_AT_FORMAT;
use crate::domain::{BOOKS_KEY, DomainError, RETURNED_HISTORY_KEY, Store};
use crate::models::book;
use crate::models::{Book, BookStatus, ReturnedBook};

/// Counts shown on the home screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogSummary {
    pub total: usize,
    pub available: usize,
    pub borrowed: usize,
    pub returned: usize,
}

#[derive(Debug, Clone, Default)]
struct Collections {
    books: Vec<Book>,
    history: Vec<ReturnedBook>,
}

pub struct CatalogService {
    store: Arc<dyn Store>,
    returned_at_format: String,
    cache: Mutex<Option<Collections>>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            returned_at_format: DEFAULT_RETURNED_AT_FORMAT.to_string(),
            cache: Mutex::new(None),
        }
    }

    /// Use a custom chrono pattern for `returnedAt`. An invalid pattern is
    /// ignored and the default kept.
    pub fn with_returned_at_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            tracing::warn!(
                "Invalid returnedAt format '{}', keeping '{}'",
                format,
                self.returned_at_format
            );
        } else {
            self.returned_at_format = format;
        }
        self
    }

    // ============ Book management ============

    /// Add a new book. Title, author and image are all required.
    pub async fn add_book(
        &self,
        title: &str,
        author: &str,
        image: &str,
    ) -> Result<Book, DomainError> {
        let title = required("title", title)?;
        let author = required("author", author)?;
        let image = required("image", image)?;

        self.update_books(|books| {
            let book = Book {
                id: next_id(books, chrono::Utc::now().timestamp_millis())?,
                title,
                author,
                image: Some(image),
                status: BookStatus::Available,
            };
            books.push(book.clone());
            tracing::info!("Added book {} '{}'", book.id, book.title);
            Ok(book)
        })
        .await
    }

    /// Overwrite title and author in place. `image: None` keeps the current
    /// image; a given image must not be blank. Status is left untouched.
    pub async fn update_book(
        &self,
        id: &str,
        title: &str,
        author: &str,
        image: Option<&str>,
    ) -> Result<Book, DomainError> {
        let title = required("title", title)?;
        let author = required("author", author)?;
        let image = image.map(|i| required("image", i)).transpose()?;

        self.update_books(|books| {
            let book = find_mut(books, id)?;
            book.title = title;
            book.author = author;
            if let Some(image) = image {
                book.image = Some(image);
            }
            tracing::info!("Updated book {}", id);
            Ok(book.clone())
        })
        .await
    }

    /// Remove a book from the catalog. History is never affected.
    pub async fn delete_book(&self, id: &str) -> Result<Book, DomainError> {
        self.update_books(|books| {
            let removed = remove_by_id(books, id)?;
            tracing::info!("Deleted book {} '{}'", removed.id, removed.title);
            Ok(removed)
        })
        .await
    }

    // ============ Borrowing ============

    pub async fn borrow_book(
        &self,
        id: &str,
        name: &str,
        student_id: &str,
    ) -> Result<Book, DomainError> {
        let borrowed_by = required("borrower name", name)?;
        let student_id = required("student id", student_id)?;

        self.update_books(|books| {
            let book = find_mut(books, id)?;
            if book.is_borrowed() {
                return Err(DomainError::InvalidState(format!(
                    "book {} is already borrowed",
                    id
                )));
            }
            tracing::info!("Book {} borrowed by {} ({})", id, borrowed_by, student_id);
            book.status = BookStatus::Borrowed {
                borrowed_by,
                student_id,
            };
            Ok(book.clone())
        })
        .await
    }

    /// Mark a borrowed book as available again and append a history snapshot.
    pub async fn return_book(&self, id: &str) -> Result<ReturnedBook, DomainError> {
        let mut slot = self.cache.lock().await;
        let cols = self.collections(&mut slot).await?;

        let mut books = cols.books.clone();
        let book = find_mut(&mut books, id)?;
        let entry = match std::mem::replace(&mut book.status, BookStatus::Available) {
            BookStatus::Borrowed {
                borrowed_by,
                student_id,
            } => ReturnedBook {
                title: book.title.clone(),
                borrowed_by,
                student_id,
                returned_at: chrono::Local::now()
                    .format(&self.returned_at_format)
                    .to_string(),
            },
            BookStatus::Available => {
                tracing::warn!("Return rejected: book {} is not borrowed", id);
                return Err(DomainError::InvalidState(format!(
                    "book {} is not borrowed",
                    id
                )));
            }
        };

        let mut history = cols.history.clone();
        history.push(entry.clone());

        self.write_books(&books).await?;
        if let Err(e) = self.write_history(&history).await {
            // Put the book back to Borrowed so it is not lost without a history entry
            if let Err(rollback) = self.write_books(&cols.books).await {
                tracing::error!(
                    "Rollback of book {} after failed return failed: {}",
                    id,
                    rollback
                );
            }
            return Err(e);
        }

        cols.books = books;
        cols.history = history;
        tracing::info!(
            "Book {} returned by {} at {}",
            id,
            entry.borrowed_by,
            entry.returned_at
        );
        Ok(entry)
    }

    /// Correct the borrower of a borrowed book. Emits no history entry.
    pub async fn edit_borrower(
        &self,
        id: &str,
        name: &str,
        student_id: &str,
    ) -> Result<Book, DomainError> {
        let name = required("borrower name", name)?;
        let new_student_id = required("student id", student_id)?;

        self.update_books(|books| {
            let book = find_mut(books, id)?;
            match &mut book.status {
                BookStatus::Borrowed {
                    borrowed_by,
                    student_id,
                } => {
                    *borrowed_by = name;
                    *student_id = new_student_id;
                }
                BookStatus::Available => {
                    return Err(DomainError::InvalidState(format!(
                        "book {} is not borrowed",
                        id
                    )));
                }
            }
            tracing::info!("Edited borrower of book {}", id);
            Ok(book.clone())
        })
        .await
    }

    /// Discard a book record from the borrower list without returning it.
    pub async fn delete_borrower_record(&self, id: &str) -> Result<Book, DomainError> {
        self.update_books(|books| {
            let removed = remove_by_id(books, id)?;
            tracing::info!(
                "Discarded record of book {} (status {})",
                removed.id,
                removed.status.as_str()
            );
            Ok(removed)
        })
        .await
    }

    // ============ Views ============

    pub async fn list_books(&self) -> Result<Vec<Book>, DomainError> {
        self.read(|cols| cols.books.clone()).await
    }

    pub async fn list_available(&self) -> Result<Vec<Book>, DomainError> {
        self.read(|cols| {
            cols.books
                .iter()
                .filter(|b| b.is_available())
                .cloned()
                .collect()
        })
        .await
    }

    pub async fn list_borrowed(&self) -> Result<Vec<Book>, DomainError> {
        self.read(|cols| {
            cols.books
                .iter()
                .filter(|b| b.is_borrowed())
                .cloned()
                .collect()
        })
        .await
    }

    pub async fn list_history(&self) -> Result<Vec<ReturnedBook>, DomainError> {
        self.read(|cols| cols.history.clone()).await
    }

    pub async fn get_book(&self, id: &str) -> Result<Book, DomainError> {
        self.read(|cols| cols.books.iter().find(|b| b.id == id).cloned())
            .await?
            .ok_or(DomainError::NotFound)
    }

    pub async fn summary(&self) -> Result<CatalogSummary, DomainError> {
        self.read(|cols| {
            let borrowed = cols.books.iter().filter(|b| b.is_borrowed()).count();
            CatalogSummary {
                total: cols.books.len(),
                available: cols.books.len() - borrowed,
                borrowed,
                returned: cols.history.len(),
            }
        })
        .await
    }

    // ============ Maintenance ============

    /// Forget the cached collections; the next call re-reads the store.
    pub async fn reload(&self) {
        *self.cache.lock().await = None;
    }

    /// Delete both collections from the store.
    pub async fn reset(&self) -> Result<(), DomainError> {
        let mut slot = self.cache.lock().await;
        *slot = None;
        self.store.remove(BOOKS_KEY).await?;
        self.store.remove(RETURNED_HISTORY_KEY).await?;
        *slot = Some(Collections::default());
        tracing::info!("Catalog reset");
        Ok(())
    }

    // ============ Internals ============

    async fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> Result<T, DomainError> {
        let mut slot = self.cache.lock().await;
        let cols = self.collections(&mut slot).await?;
        Ok(f(cols))
    }

    /// Apply `f` to a copy of the book list and persist it. On any error the
    /// cache and the store keep their previous value.
    async fn update_books<T>(
        &self,
        f: impl FnOnce(&mut Vec<Book>) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut slot = self.cache.lock().await;
        let cols = self.collections(&mut slot).await?;

        let mut books = cols.books.clone();
        let result = f(&mut books).inspect_err(|e| tracing::warn!("Rejected: {}", e))?;

        self.write_books(&books).await?;
        cols.books = books;
        Ok(result)
    }

    async fn collections<'a>(
        &self,
        slot: &'a mut Option<Collections>,
    ) -> Result<&'a mut Collections, DomainError> {
        if slot.is_none() {
            *slot = Some(self.read_collections().await?);
        }
        Ok(slot.get_or_insert_with(Collections::default))
    }

    async fn read_collections(&self) -> Result<Collections, DomainError> {
        let models: Vec<book::Model> =
            serde_json::from_value(self.store.load(BOOKS_KEY).await?)?;
        let books = models
            .into_iter()
            .map(Book::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let history: Vec<ReturnedBook> =
            serde_json::from_value(self.store.load(RETURNED_HISTORY_KEY).await?)?;

        tracing::debug!(
            "Loaded {} books and {} history entries",
            books.len(),
            history.len()
        );
        Ok(Collections { books, history })
    }

    async fn write_books(&self, books: &[Book]) -> Result<(), DomainError> {
        let models: Vec<book::Model> = books.iter().cloned().map(book::Model::from).collect();
        self.store
            .save(BOOKS_KEY, &serde_json::to_value(models)?)
            .await
    }

    async fn write_history(&self, history: &[ReturnedBook]) -> Result<(), DomainError> {
        self.store
            .save(RETURNED_HISTORY_KEY, &serde_json::to_value(history)?)
            .await
    }
}

/// Trimmed value of a required text field
fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(value.to_string())
}

fn find_mut<'a>(books: &'a mut [Book], id: &str) -> Result<&'a mut Book, DomainError> {
    books
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or(DomainError::NotFound)
}

fn remove_by_id(books: &mut Vec<Book>, id: &str) -> Result<Book, DomainError> {
    let pos = books
        .iter()
        .position(|b| b.id == id)
        .ok_or(DomainError::NotFound)?;
    Ok(books.remove(pos))
}

/// Millisecond timestamp, bumped past the highest numeric id already in use
fn next_id(books: &[Book], now_ms: i64) -> Result<String, DomainError> {
    let highest = books.iter().filter_map(|b| b.id.parse::<i64>().ok()).max();
    match highest {
        Some(max) if max >= now_ms => max
            .checked_add(1)
            .map(|id| id.to_string())
            .ok_or_else(|| DomainError::Storage(format!("no id left after {}", max))),
        _ => Ok(now_ms.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryStore;

    fn book(id: &str) -> Book {
        Book {
            id: id.to_string(),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            image: None,
            status: BookStatus::Available,
        }
    }

    #[test]
    fn test_next_id_uses_clock_when_ahead() {
        assert_eq!(next_id(&[book("100")], 200).unwrap(), "200");
        assert_eq!(next_id(&[], 200).unwrap(), "200");
    }

    #[test]
    fn test_next_id_bumps_past_existing() {
        assert_eq!(next_id(&[book("200"), book("150")], 200).unwrap(), "201");
        assert_eq!(next_id(&[book("500")], 200).unwrap(), "501");
    }

    #[test]
    fn test_next_id_at_i64_max_is_an_error() {
        let top = i64::MAX.to_string();
        assert!(matches!(
            next_id(&[book(&top)], 200),
            Err(DomainError::Storage(_))
        ));
    }

    #[test]
    fn test_next_id_ignores_non_numeric_ids() {
        assert_eq!(next_id(&[book("legacy-a")], 42).unwrap(), "42");
    }

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required("title", "  Dune ").unwrap(), "Dune");
        assert!(matches!(
            required("title", "   "),
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_add_book_after_max_id_is_rejected_without_change() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_raw(
            BOOKS_KEY,
            format!(
                r#"[{{"id":"{}","title":"Dune","author":"Herbert","status":"Available"}}]"#,
                i64::MAX
            ),
        );
        let service = CatalogService::new(store);

        let err = service.add_book("Emma", "Austen", "e.jpg").await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
        assert_eq!(service.list_books().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_without_image_keeps_current_one() {
        let service = CatalogService::new(Arc::new(InMemoryStore::new()));
        let dune = service.add_book("Dune", "Herbert", "x.jpg").await.unwrap();

        let renamed = service
            .update_book(&dune.id, "Dune", "Frank Herbert", None)
            .await
            .unwrap();
        assert_eq!(renamed.image.as_deref(), Some("x.jpg"));

        assert!(matches!(
            service.update_book(&dune.id, "Dune", "Herbert", Some("  ")).await,
            Err(DomainError::Validation(_))
        ));
        let current = service.get_book(&dune.id).await.unwrap();
        assert_eq!(current.author, "Frank Herbert");
        assert_eq!(current.image.as_deref(), Some("x.jpg"));
    }

    #[tokio::test]
    async fn test_invalid_format_keeps_default() {
        let service = CatalogService::new(Arc::new(InMemoryStore::new()))
            .with_returned_at_format("%Q broken %");
        assert_eq!(service.returned_at_format, DEFAULT_RETURNED_AT_FORMAT);
    }

    #[tokio::test]
    async fn test_custom_format_is_applied() {
        let service = CatalogService::new(Arc::new(InMemoryStore::new()))
            .with_returned_at_format("%Y-%m-%d %H:%M:%S");
        let added = service.add_book("Dune", "Herbert", "x.jpg").await.unwrap();
        service.borrow_book(&added.id, "Alice", "42").await.unwrap();
        let entry = service.return_book(&added.id).await.unwrap();
        assert!(
            chrono::NaiveDateTime::parse_from_str(&entry.returned_at, "%Y-%m-%d %H:%M:%S").is_ok()
        );
    }
}
