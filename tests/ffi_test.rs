use rust_lib_borrowease::api::frb;
use serial_test::serial;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

// The FFI keeps one backend per process, so every test runs on the same
// runtime as the pool it created and starts from a reset catalog.
fn runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create runtime"))
}

async fn setup_backend() {
    let path = std::env::temp_dir().join(format!("borrowease_ffi_{}.db", uuid::Uuid::new_v4()));
    frb::init_backend(path.display().to_string())
        .await
        .expect("Failed to init backend");
    frb::reset_app().await.expect("Failed to reset");
}

#[test]
#[serial]
fn test_backend_reports_ready() {
    runtime().block_on(async {
        setup_backend().await;

        assert_eq!(frb::health_check(), "OK");
        assert!(!frb::get_version().is_empty());
        frb::ping_database().await.expect("database should answer");

        // A second init keeps the existing backend
        let msg = frb::init_backend("/nonexistent/other.db".to_string())
            .await
            .unwrap();
        assert_eq!(msg, "Already initialized");
    });
}

#[test]
#[serial]
fn test_borrow_flow_through_ffi() {
    runtime().block_on(async {
        setup_backend().await;

        let book = frb::add_book("Dune".into(), "Herbert".into(), "x.jpg".into())
            .await
            .unwrap();
        assert_eq!(book.status, "Available");
        assert_eq!(book.borrowed_by, None);

        let lent = frb::borrow_book(book.id.clone(), "Alice".into(), "42".into())
            .await
            .unwrap();
        assert_eq!(lent.status, "Borrowed");
        assert_eq!(lent.borrowed_by.as_deref(), Some("Alice"));
        assert_eq!(lent.student_id.as_deref(), Some("42"));
        assert_eq!(frb::get_borrowed_books().await.unwrap().len(), 1);
        assert!(frb::get_available_books().await.unwrap().is_empty());

        let entry = frb::return_book(book.id.clone()).await.unwrap();
        assert_eq!(entry.title, "Dune");
        assert_eq!(entry.borrowed_by, "Alice");

        let history = frb::get_returned_history().await.unwrap();
        assert_eq!(history.len(), 1);

        let summary = frb::get_summary().await.unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.available, 1);
        assert_eq!(summary.borrowed, 0);
        assert_eq!(summary.returned, 1);
    });
}

#[test]
#[serial]
fn test_errors_cross_as_messages() {
    runtime().block_on(async {
        setup_backend().await;

        let err = frb::add_book("".into(), "Herbert".into(), "x.jpg".into())
            .await
            .unwrap_err();
        assert_eq!(err, "Validation error: title must not be empty");

        let err = frb::get_book("missing".into()).await.unwrap_err();
        assert_eq!(err, "Book not found");

        let book = frb::add_book("Dune".into(), "Herbert".into(), "x.jpg".into())
            .await
            .unwrap();
        let err = frb::return_book(book.id.clone()).await.unwrap_err();
        assert!(err.starts_with("Invalid state"), "got {}", err);
    });
}

#[test]
#[serial]
fn test_edit_and_delete_borrower_record() {
    runtime().block_on(async {
        setup_backend().await;

        let book = frb::add_book("Emma".into(), "Austen".into(), "e.jpg".into())
            .await
            .unwrap();
        frb::borrow_book(book.id.clone(), "Bbo".into(), "7".into())
            .await
            .unwrap();

        let fixed = frb::edit_borrower(book.id.clone(), "Bob".into(), "7".into())
            .await
            .unwrap();
        assert_eq!(fixed.borrowed_by.as_deref(), Some("Bob"));

        let renamed = frb::update_book(book.id.clone(), "Emma".into(), "Jane Austen".into(), None)
            .await
            .unwrap();
        assert_eq!(renamed.author, "Jane Austen");
        assert_eq!(renamed.image.as_deref(), Some("e.jpg"));
        assert_eq!(renamed.status, "Borrowed");

        frb::delete_borrower_record(book.id.clone()).await.unwrap();
        assert!(frb::get_all_books().await.unwrap().is_empty());
        assert!(frb::get_returned_history().await.unwrap().is_empty());

        let other = frb::add_book("Ulysses".into(), "Joyce".into(), "u.jpg".into())
            .await
            .unwrap();
        frb::delete_book(other.id).await.unwrap();
        assert!(frb::get_all_books().await.unwrap().is_empty());
    });
}
