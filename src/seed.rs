//! Initial store contents: the built-in catalogue or a JSON seed file.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Deserialize;
use shelf_db::{Book, InMemoryBookStore, InMemoryUserStore, SecurityQuestion, User};
use shelf_kernel::settings::Settings;

/// Stores handed to the modules at startup.
pub struct Stores {
    pub books: Arc<InMemoryBookStore>,
    pub users: Arc<InMemoryUserStore>,
}

/// On-disk seed format. User entries carry bcrypt hashes, see
/// `shelf-cli hash-password`.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// Build the stores from `store.seed_path`, or the built-in data when unset.
pub fn load_stores(settings: &Settings) -> anyhow::Result<Stores> {
    let seed = match &settings.store.seed_path {
        Some(path) => read_seed_file(path)?,
        None => builtin_seed(settings.auth.bcrypt_cost)?,
    };

    check_seed(&seed)?;

    tracing::info!(
        books = seed.books.len(),
        users = seed.users.len(),
        "stores seeded"
    );

    Ok(Stores {
        books: Arc::new(InMemoryBookStore::with_books(seed.books)),
        users: Arc::new(InMemoryUserStore::new(seed.users)),
    })
}

pub fn read_seed_file(path: &Path) -> anyhow::Result<SeedFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse seed file {}", path.display()))
}

fn check_seed(seed: &SeedFile) -> anyhow::Result<()> {
    let mut ids = HashSet::new();
    for book in &seed.books {
        if book.title.is_empty() {
            bail!("seed book {} has an empty title", book.id);
        }
        if !ids.insert(book.id) {
            bail!("seed book id {} appears more than once", book.id);
        }
    }

    let mut emails = HashSet::new();
    for user in &seed.users {
        if !emails.insert(user.email.as_str()) {
            bail!("seed user {} appears more than once", user.email);
        }
    }

    Ok(())
}

/// The default catalogue and demo accounts. Passwords are hashed at `cost`.
pub fn builtin_seed(cost: u32) -> anyhow::Result<SeedFile> {
    let books = [
        "The Fellowship of the Ring",
        "The Two Towers",
        "The Return of the King",
        "The Hobbit",
        "The Silmarillion",
    ]
    .into_iter()
    .zip(1..)
    .map(|(title, id)| Book {
        id,
        title: title.to_string(),
        author: Some("J.R.R. Tolkien".to_string()),
    })
    .collect();

    let accounts = [
        (
            "harry@hogwarts.edu",
            "potter",
            ["Hedwig", "Quidditch Through the Ages", "Evans"],
        ),
        (
            "hermione@hogwarts.edu",
            "granger",
            ["Crookshanks", "Hogwarts: A History", "Granger"],
        ),
        (
            "ron@hogwarts.edu",
            "weasley",
            ["Scabbers", "Quidditch Through the Ages", "Weasley"],
        ),
    ];
    let questions = [
        "What is your pet's name?",
        "What is your favorite book?",
        "What is your mother's maiden name?",
    ];

    let users = accounts
        .into_iter()
        .map(|(email, password, answers)| -> anyhow::Result<User> {
            let password_hash = bcrypt::hash(password, cost)
                .with_context(|| format!("failed to hash seed password for {}", email))?;
            let security_questions = questions
                .iter()
                .zip(answers)
                .map(|(question, answer)| SecurityQuestion {
                    question: Some(question.to_string()),
                    answer: answer.to_string(),
                })
                .collect();

            Ok(User {
                email: email.to_string(),
                password_hash,
                security_questions,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(SeedFile { books, users })
}
