//! Record stores backing the bookstore API.
//!
//! Both stores are injected into handlers as trait objects so that the HTTP
//! layer never reaches for process globals. "Not found" is always an absent
//! value, never an error.

pub mod books;
pub mod users;

pub use books::{Book, BookChanges, BookStore, BookStoreError, InMemoryBookStore, NewBook};
pub use users::{InMemoryUserStore, SecurityQuestion, User, UserStore};
