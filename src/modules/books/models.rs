use serde::Serialize;
use shelf_db::{BookChanges, NewBook};

/// Validated title/author pair shared by create and update requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: Option<String>,
}

impl BookFields {
    pub fn into_new_book(self) -> NewBook {
        NewBook {
            title: self.title,
            author: self.author,
        }
    }

    pub fn into_changes(self) -> BookChanges {
        BookChanges {
            title: self.title,
            author: self.author,
        }
    }
}

/// Response body for a created book.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedBook {
    pub id: i64,
}
