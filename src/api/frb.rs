// FFI API module for flutter_rust_bridge
// This module exposes the catalog to the mobile UI without any HTTP layer.
//
// ARCHITECTURE: one AppState per process, created by init_backend and shared
// by every call. All catalog calls go through the same CatalogService, so
// writes coming from different screens are serialized.

use flutter_rust_bridge::frb;
use std::sync::OnceLock;

use crate::config::Config;
use crate::infrastructure::AppState;
use crate::models::{Book, BookStatus, ReturnedBook};
use crate::services::{CatalogService, CatalogSummary};

// Global state (initialized once on app start)
static STATE: OnceLock<AppState> = OnceLock::new();

/// Install a panic hook to prevent crashes on iOS
/// This converts panics into logs instead of aborting
fn install_panic_hook() {
    use std::sync::Once;
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|panic_info| {
            let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            let location = panic_info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "unknown location".to_string());
            tracing::error!("FFI PANIC at {}: {}", location, message);
        }));
    });
}

/// Get the catalog (must be initialized first)
fn catalog() -> Result<&'static CatalogService, String> {
    STATE
        .get()
        .map(|state| state.catalog.as_ref())
        .ok_or_else(|| "Backend not initialized".to_string())
}

// ============ FFI-Compatible Data Structures ============

/// Flat book structure for FFI
#[frb(dart_metadata=("freezed"))]
#[derive(Debug, Clone)]
pub struct FrbBook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub image: Option<String>,
    pub status: String, // 'Available', 'Borrowed'
    pub borrowed_by: Option<String>,
    pub student_id: Option<String>,
}

impl From<Book> for FrbBook {
    fn from(book: Book) -> Self {
        let status = book.status.as_str().to_string();
        let (borrowed_by, student_id) = match book.status {
            BookStatus::Available => (None, None),
            BookStatus::Borrowed {
                borrowed_by,
                student_id,
            } => (Some(borrowed_by), Some(student_id)),
        };

        FrbBook {
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

/// Returned-history entry for FFI
#[frb(dart_metadata=("freezed"))]
#[derive(Debug, Clone)]
pub struct FrbReturnedBook {
    pub title: String,
    pub borrowed_by: String,
    pub student_id: String,
    pub returned_at: String,
}

impl From<ReturnedBook> for FrbReturnedBook {
    fn from(entry: ReturnedBook) -> Self {
        FrbReturnedBook {
            title: entry.title,
            borrowed_by: entry.borrowed_by,
            student_id: entry.student_id,
            returned_at: entry.returned_at,
        }
    }
}

/// Home screen counters
#[frb(dart_metadata=("freezed"))]
#[derive(Debug, Clone)]
pub struct FrbSummary {
    pub total: u32,
    pub available: u32,
    pub borrowed: u32,
    pub returned: u32,
}

impl From<CatalogSummary> for FrbSummary {
    fn from(s: CatalogSummary) -> Self {
        FrbSummary {
            total: s.total as u32,
            available: s.available as u32,
            borrowed: s.borrowed as u32,
            returned: s.returned as u32,
        }
    }
}

// ============ Initialization ============

/// Initialize the FFI backend with the database at the given path
/// Must be called before any other FFI functions
pub async fn init_backend(db_path: String) -> Result<String, String> {
    // Install panic hook first thing to catch any panics
    install_panic_hook();

    if STATE.get().is_some() {
        return Ok("Already initialized".to_string());
    }

    let mut config = Config::from_env();
    crate::logging::init_tracing(&config.log_filter);

    config.database_url = format!("sqlite:{}?mode=rwc", db_path);
    tracing::info!("FFI: Using database {}", config.database_url);

    let db = crate::db::init_db(&config.database_url)
        .await
        .map_err(|e| format!("Database initialization failed: {}", e))?;

    let state = AppState::new(db, &config);

    if config.seed_demo {
        match crate::seed::seed_demo_data(&state.catalog).await {
            Ok(count) => tracing::info!("FFI: Seeded {} demo books", count),
            Err(e) => tracing::error!("FFI: Failed to seed demo data: {}", e),
        }
    }

    match STATE.set(state) {
        Ok(_) => Ok("Backend initialized successfully".to_string()),
        Err(_) => Ok("Already initialized".to_string()),
    }
}

// ============ Health Check ============

/// Check if the FFI backend is healthy
#[frb(sync)]
pub fn health_check() -> String {
    if STATE.get().is_some() {
        "OK".to_string()
    } else {
        "NOT_INITIALIZED".to_string()
    }
}

/// Check that the database still answers
pub async fn ping_database() -> Result<(), String> {
    let state = STATE.get().ok_or("Backend not initialized")?;
    state.db().ping().await.map_err(|e| e.to_string())
}

/// Get the FFI backend version
#[frb(sync)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ============ Books API ============

/// Add a new book (title, author and image are required)
pub async fn add_book(title: String, author: String, image: String) -> Result<FrbBook, String> {
    catalog()?
        .add_book(&title, &author, &image)
        .await
        .map(FrbBook::from)
        .map_err(|e| e.to_string())
}

/// Update title, author and image of an existing book.
/// Pass `image: None` to keep the current image; an empty image is rejected.
pub async fn update_book(
    id: String,
    title: String,
    author: String,
    image: Option<String>,
) -> Result<FrbBook, String> {
    catalog()?
        .update_book(&id, &title, &author, image.as_deref())
        .await
        .map(FrbBook::from)
        .map_err(|e| e.to_string())
}

/// Delete a book
pub async fn delete_book(id: String) -> Result<(), String> {
    catalog()?
        .delete_book(&id)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Get a single book by ID
pub async fn get_book(id: String) -> Result<FrbBook, String> {
    catalog()?
        .get_book(&id)
        .await
        .map(FrbBook::from)
        .map_err(|e| e.to_string())
}

/// Get every book, in insertion order
pub async fn get_all_books() -> Result<Vec<FrbBook>, String> {
    let books = catalog()?.list_books().await.map_err(|e| e.to_string())?;
    Ok(books.into_iter().map(FrbBook::from).collect())
}

/// Get books that can be borrowed
pub async fn get_available_books() -> Result<Vec<FrbBook>, String> {
    let books = catalog()?
        .list_available()
        .await
        .map_err(|e| e.to_string())?;
    Ok(books.into_iter().map(FrbBook::from).collect())
}

// ============ Borrowing API ============

/// Lend a book to a student
pub async fn borrow_book(
    id: String,
    student_name: String,
    student_id: String,
) -> Result<FrbBook, String> {
    catalog()?
        .borrow_book(&id, &student_name, &student_id)
        .await
        .map(FrbBook::from)
        .map_err(|e| e.to_string())
}

/// Return a borrowed book; the new history entry is returned
pub async fn return_book(id: String) -> Result<FrbReturnedBook, String> {
    catalog()?
        .return_book(&id)
        .await
        .map(FrbReturnedBook::from)
        .map_err(|e| e.to_string())
}

/// Correct the borrower name / student id of a borrowed book
pub async fn edit_borrower(
    id: String,
    student_name: String,
    student_id: String,
) -> Result<FrbBook, String> {
    catalog()?
        .edit_borrower(&id, &student_name, &student_id)
        .await
        .map(FrbBook::from)
        .map_err(|e| e.to_string())
}

/// Discard a borrowed book's record without returning it
pub async fn delete_borrower_record(id: String) -> Result<(), String> {
    catalog()?
        .delete_borrower_record(&id)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Get books currently lent out
pub async fn get_borrowed_books() -> Result<Vec<FrbBook>, String> {
    let books = catalog()?
        .list_borrowed()
        .await
        .map_err(|e| e.to_string())?;
    Ok(books.into_iter().map(FrbBook::from).collect())
}

/// Get the return history, oldest first
pub async fn get_returned_history() -> Result<Vec<FrbReturnedBook>, String> {
    let history = catalog()?
        .list_history()
        .await
        .map_err(|e| e.to_string())?;
    Ok(history.into_iter().map(FrbReturnedBook::from).collect())
}

/// Counters for the home screen
pub async fn get_summary() -> Result<FrbSummary, String> {
    catalog()?
        .summary()
        .await
        .map(FrbSummary::from)
        .map_err(|e| e.to_string())
}

// ============ Reset API ============

/// Reset the entire application - deletes all books and the return history
/// This is irreversible and should be used with caution
pub async fn reset_app() -> Result<String, String> {
    catalog()?.reset().await.map_err(|e| e.to_string())?;
    Ok("App reset successfully - all data cleared".to_string())
}
