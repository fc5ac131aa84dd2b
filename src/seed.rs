use crate::domain::DomainError;
use crate::services::CatalogService;

const DEMO_BOOKS: [(&str, &str, &str); 3] = [
    ("Dune", "Frank Herbert", "demo://covers/dune.jpg"),
    ("Foundation", "Isaac Asimov", "demo://covers/foundation.jpg"),
    ("The Hobbit", "J.R.R. Tolkien", "demo://covers/hobbit.jpg"),
];

/// Fill an empty catalog with a few books, one of them lent out.
/// Returns the number of books added; a non-empty catalog is left alone.
pub async fn seed_demo_data(catalog: &CatalogService) -> Result<usize, DomainError> {
    if !catalog.list_books().await?.is_empty() {
        tracing::info!("Catalog not empty, skipping demo data");
        return Ok(0);
    }

    let mut ids = Vec::with_capacity(DEMO_BOOKS.len());
    for (title, author, image) in DEMO_BOOKS {
        ids.push(catalog.add_book(title, author, image).await?.id);
    }

    if let Some(first) = ids.first() {
        catalog.borrow_book(first, "Demo Student", "0001").await?;
    }

    Ok(ids.len())
}
