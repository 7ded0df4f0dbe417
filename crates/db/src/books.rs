use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

/// A book in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// Validated payload for inserting a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: Option<String>,
}

/// Validated payload for updating a book. A `None` author keeps the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookChanges {
    pub title: String,
    pub author: Option<String>,
}

/// Failures a book store can report. Lookups of absent ids are not errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookStoreError {
    #[error("no book id is left after {max}")]
    IdsExhausted { max: i64 },
}

pub type BookPredicate<'a> = &'a (dyn Fn(&Book) -> bool + Send + Sync);

/// Book storage abstraction.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every book, ascending by id
    async fn find_all(&self) -> Vec<Book>;

    /// Every book matching `predicate`, ascending by id
    async fn find(&self, predicate: BookPredicate<'_>) -> Vec<Book>;

    /// First book matching `predicate`
    async fn find_one(&self, predicate: BookPredicate<'_>) -> Option<Book>;

    async fn find_by_id(&self, id: i64) -> Option<Book> {
        self.find_one(&|book: &Book| book.id == id).await
    }

    /// Store a new book and return it with its assigned id
    async fn insert(&self, book: NewBook) -> Result<Book, BookStoreError>;

    /// Apply `changes` to the book with `id`, returning the updated record
    async fn update(&self, id: i64, changes: BookChanges) -> Option<Book>;

    /// Remove the book with `id`, returning the removed record
    async fn delete(&self, id: i64) -> Option<Book>;
}

/// `Vec`-backed store. Ids are `max(id) + 1` over the books currently held,
/// so the id of a deleted highest book is handed out again.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding `books`, sorted by id.
    pub fn with_books(mut books: Vec<Book>) -> Self {
        books.sort_by_key(|book| book.id);
        Self {
            books: RwLock::new(books),
        }
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn find_all(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    async fn find(&self, predicate: BookPredicate<'_>) -> Vec<Book> {
        let books = self.books.read().await;
        books.iter().filter(|book| predicate(book)).cloned().collect()
    }

    async fn find_one(&self, predicate: BookPredicate<'_>) -> Option<Book> {
        let books = self.books.read().await;
        books.iter().find(|book| predicate(book)).cloned()
    }

    async fn insert(&self, book: NewBook) -> Result<Book, BookStoreError> {
        let mut books = self.books.write().await;

        let id = match books.iter().map(|b| b.id).max() {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .ok_or(BookStoreError::IdsExhausted { max })?,
        };
        let book = Book {
            id,
            title: book.title,
            author: book.author,
        };
        books.push(book.clone());

        tracing::debug!(target: "shelf-db", id, "book inserted");
        Ok(book)
    }

    async fn update(&self, id: i64, changes: BookChanges) -> Option<Book> {
        let mut books = self.books.write().await;
        let book = books.iter_mut().find(|book| book.id == id)?;

        book.title = changes.title;
        if let Some(author) = changes.author {
            book.author = Some(author);
        }

        tracing::debug!(target: "shelf-db", id, "book updated");
        Some(book.clone())
    }

    async fn delete(&self, id: i64) -> Option<Book> {
        let mut books = self.books.write().await;
        let index = books.iter().position(|book| book.id == id)?;

        tracing::debug!(target: "shelf-db", id, "book deleted");
        Some(books.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: None,
        }
    }

    fn seeded() -> InMemoryBookStore {
        InMemoryBookStore::with_books(vec![
            Book {
                id: 3,
                title: "The Return of the King".to_string(),
                author: Some("J.R.R. Tolkien".to_string()),
            },
            Book {
                id: 1,
                title: "The Fellowship of the Ring".to_string(),
                author: Some("J.R.R. Tolkien".to_string()),
            },
        ])
    }

    #[tokio::test]
    async fn first_insert_into_empty_store_gets_id_one() {
        let store = InMemoryBookStore::new();
        let book = store.insert(new_book("Dune")).await.unwrap();
        assert_eq!(book.id, 1);
    }

    #[tokio::test]
    async fn insert_uses_max_id_plus_one() {
        let store = seeded();
        let book = store.insert(new_book("The Hobbit")).await.unwrap();
        assert_eq!(book.id, 4);

        let ids: Vec<i64> = store.find_all().await.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[tokio::test]
    async fn deleting_the_highest_id_frees_it_for_reuse() {
        let store = seeded();
        assert!(store.delete(3).await.is_some());

        let book = store.insert(new_book("The Silmarillion")).await.unwrap();
        assert_eq!(book.id, 2);
    }

    #[tokio::test]
    async fn insert_after_max_id_is_an_error() {
        let store = InMemoryBookStore::with_books(vec![Book {
            id: i64::MAX,
            title: "The Last Book".to_string(),
            author: None,
        }]);

        let err = store.insert(new_book("One Too Many")).await.unwrap_err();
        assert_eq!(err, BookStoreError::IdsExhausted { max: i64::MAX });
        assert_eq!(store.find_all().await.len(), 1);
    }

    #[tokio::test]
    async fn update_keeps_author_when_not_given() {
        let store = seeded();
        let updated = store
            .update(
                1,
                BookChanges {
                    title: "Fellowship".to_string(),
                    author: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Fellowship");
        assert_eq!(updated.author.as_deref(), Some("J.R.R. Tolkien"));
        assert_eq!(store.find_by_id(1).await, Some(updated));
    }

    #[tokio::test]
    async fn missing_ids_are_absent_not_errors() {
        let store = seeded();
        assert!(store.find_by_id(42).await.is_none());
        assert!(store.delete(42).await.is_none());
        assert!(store
            .update(
                42,
                BookChanges {
                    title: "Nothing".to_string(),
                    author: None,
                },
            )
            .await
            .is_none());
    }

    #[tokio::test]
    async fn find_filters_by_predicate() {
        let store = seeded();
        store
            .insert(NewBook {
                title: "Dune".to_string(),
                author: Some("Frank Herbert".to_string()),
            })
            .await
            .unwrap();

        let tolkien = store
            .find(&|book: &Book| book.author.as_deref() == Some("J.R.R. Tolkien"))
            .await;
        assert_eq!(tolkien.len(), 2);
    }

    #[test]
    fn book_serializes_absent_author_as_null() {
        let book = Book {
            id: 7,
            title: "Untitled".to_string(),
            author: None,
        };
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value, serde_json::json!({"id": 7, "title": "Untitled", "author": null}));
    }
}
