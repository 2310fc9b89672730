//! User inspection command handlers

use crate::config::Config;
use crate::db::Store;
use crate::db::username::{UsernameAllocator, derive_base};

pub async fn cmd_users_list(config: &Config) -> anyhow::Result<()> {
    let store = Store::from_config(config).await?;

    let users = store.list_users().await?;

    if users.is_empty() {
        println!("No user accounts.");
        return Ok(());
    }

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let username = user.username.as_deref().unwrap_or("(not backfilled)");
        println!("[{}] {} | {}", user.id, username, user.email);
        println!("  Role: {} | Created: {}", user.role, user.created_at);
    }

    Ok(())
}

/// Dry run of the username backfill: resolves against the live taken set
/// but writes nothing.
pub async fn cmd_users_preview(config: &Config) -> anyhow::Result<()> {
    let store = Store::from_config(config).await?;

    let pending = store.users_missing_username().await?;

    if pending.is_empty() {
        println!("All users already have a username.");
        return Ok(());
    }

    let taken = store.taken_usernames().await?;
    let mut allocator = UsernameAllocator::new(taken);

    println!("Pending username assignments ({}):", pending.len());
    println!("{:-<70}", "");

    for user in &pending {
        let username = allocator.allocate(&derive_base(&user.email));
        println!("[{}] {} -> {}", user.id, user.email, username);
    }

    println!();
    println!("Run 'registrar migrate' to apply.");

    Ok(())
}
