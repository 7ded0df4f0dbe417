pub mod books;
pub mod users;

use anyhow::Context;
use shelf_kernel::{settings::Settings, ModuleRegistry};

use crate::seed::Stores;
use users::credentials::PasswordVerifier;

/// Register all project-specific modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    settings: &Settings,
    stores: Stores,
) -> anyhow::Result<()> {
    let verifier = PasswordVerifier::for_stored_hashes(
        stores.users.password_hashes(),
        settings.auth.bcrypt_cost,
    )
    .with_context(|| "failed to build password verifier")?;

    registry.register(books::create_module(stores.books))?;
    registry.register(users::create_module(
        stores.users,
        verifier,
        settings.auth.security_question_count,
    ))?;

    Ok(())
}
