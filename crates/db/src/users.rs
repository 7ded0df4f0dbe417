use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A stored security question. Only `answer` takes part in verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityQuestion {
    #[serde(default)]
    pub question: Option<String>,
    pub answer: String,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub email: String,
    /// bcrypt hash, never plaintext
    pub password_hash: String,
    #[serde(default)]
    pub security_questions: Vec<SecurityQuestion>,
}

pub type UserPredicate<'a> = &'a (dyn Fn(&User) -> bool + Send + Sync);

/// Read-only user lookup.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_one(&self, predicate: UserPredicate<'_>) -> Option<User>;

    async fn find_by_email(&self, email: &str) -> Option<User> {
        self.find_one(&|user: &User| user.email == email).await
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Vec<User>,
}

impl InMemoryUserStore {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Every stored password hash
    pub fn password_hashes(&self) -> impl Iterator<Item = &str> {
        self.users.iter().map(|user| user.password_hash.as_str())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_one(&self, predicate: UserPredicate<'_>) -> Option<User> {
        self.users.iter().find(|user| predicate(user)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryUserStore {
        InMemoryUserStore::new(vec![User {
            email: "harry@hogwarts.edu".to_string(),
            password_hash: "$2b$04$placeholder".to_string(),
            security_questions: vec![SecurityQuestion {
                question: Some("What is your pet's name?".to_string()),
                answer: "Hedwig".to_string(),
            }],
        }])
    }

    #[tokio::test]
    async fn find_by_email_is_exact() {
        let store = store();
        assert!(store.find_by_email("harry@hogwarts.edu").await.is_some());
        assert!(store.find_by_email("HARRY@hogwarts.edu").await.is_none());
        assert!(store.find_by_email("ron@hogwarts.edu").await.is_none());
    }

    #[test]
    fn user_deserializes_without_questions() {
        let user: User = serde_json::from_value(serde_json::json!({
            "email": "a@b.c",
            "password_hash": "$2b$04$x"
        }))
        .unwrap();
        assert!(user.security_questions.is_empty());
    }
}
