pub mod book;
pub mod kv_entry;
pub mod returned_book;

pub use book::{Book, BookStatus};
pub use returned_book::ReturnedBook;
