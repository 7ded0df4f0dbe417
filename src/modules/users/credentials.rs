//! bcrypt password checks with equal cost for known and unknown users.

use anyhow::Context;

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Verifies login passwords. An unknown account is checked against a decoy
/// hash so it costs the same as a wrong password.
pub struct PasswordVerifier {
    decoy_hash: String,
}

impl PasswordVerifier {
    /// Decoy hashed at `cost`. Prefer [`PasswordVerifier::for_stored_hashes`].
    pub fn new(cost: u32) -> anyhow::Result<Self> {
        let decoy_hash =
            bcrypt::hash(DECOY_PASSWORD, cost).context("failed to prepare decoy password hash")?;
        Ok(Self { decoy_hash })
    }

    /// Decoy hashed at the highest cost found among `hashes`, or at
    /// `fallback_cost` when none of them parse.
    pub fn for_stored_hashes<'a>(
        hashes: impl IntoIterator<Item = &'a str>,
        fallback_cost: u32,
    ) -> anyhow::Result<Self> {
        let cost = decoy_cost(hashes).unwrap_or(fallback_cost);
        tracing::debug!(cost, "decoy password hash cost chosen");
        Self::new(cost)
    }

    /// `true` only when `stored_hash` is present and matches `password`.
    pub async fn verify(
        &self,
        password: String,
        stored_hash: Option<String>,
    ) -> anyhow::Result<bool> {
        let known = stored_hash.is_some();
        let hash = stored_hash.unwrap_or_else(|| self.decoy_hash.clone());

        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .context("password verification task failed")?;

        match matched {
            Ok(matched) => Ok(known && matched),
            Err(e) => {
                // A corrupt stored hash never authenticates.
                tracing::warn!(error = %e, "stored password hash could not be verified");
                Ok(false)
            }
        }
    }
}

fn decoy_cost<'a>(hashes: impl IntoIterator<Item = &'a str>) -> Option<u32> {
    hashes
        .into_iter()
        .filter_map(|hash| hash.parse::<bcrypt::HashParts>().ok())
        .map(|parts| parts.get_cost())
        .max()
}
