//! Integrity check command handler

use anyhow::Context;
use serde::Serialize;

use crate::config::Config;
use crate::db::Store;
use crate::db::username::is_valid_username;

#[derive(Debug, Serialize)]
struct DuplicateUsername {
    username: String,
    holders: i64,
}

#[derive(Debug, Serialize)]
struct IntegrityReport {
    missing_usernames: u64,
    duplicate_usernames: Vec<DuplicateUsername>,
    invalid_usernames: Vec<String>,
    ok: bool,
}

pub async fn cmd_check(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = Store::from_config(config).await?;

    store.ping().await.context("Database is unreachable")?;

    let missing = store.missing_username_count().await?;
    let duplicates: Vec<DuplicateUsername> = store
        .duplicate_usernames()
        .await?
        .into_iter()
        .map(|(username, holders)| DuplicateUsername { username, holders })
        .collect();
    let invalid: Vec<String> = store
        .taken_usernames()
        .await?
        .into_iter()
        .filter(|name| !is_valid_username(name))
        .collect();

    let ok = duplicates.is_empty() && invalid.is_empty();
    let report = IntegrityReport {
        missing_usernames: missing,
        duplicate_usernames: duplicates,
        invalid_usernames: invalid,
        ok,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Integrity Check");
        println!("{:-<60}", "");
        println!("Database reachable:  yes");
        println!("Missing usernames:   {}", report.missing_usernames);

        if report.duplicate_usernames.is_empty() {
            println!("Duplicate usernames: none");
        } else {
            println!(
                "Duplicate usernames: {} ⚠",
                report.duplicate_usernames.len()
            );
            for dup in &report.duplicate_usernames {
                println!("  • '{}' held by {} users", dup.username, dup.holders);
            }
        }

        if report.invalid_usernames.is_empty() {
            println!("Invalid usernames:   none");
        } else {
            println!("Invalid usernames:   {} ⚠", report.invalid_usernames.len());
            for name in &report.invalid_usernames {
                println!("  • '{}'", name);
            }
        }

        println!();
        if report.ok {
            if report.missing_usernames > 0 {
                println!(
                    "{} user(s) still need a username. Run 'registrar migrate'.",
                    report.missing_usernames
                );
            } else {
                println!("✓ All checks passed.");
            }
        }
    }

    if !report.ok {
        anyhow::bail!("Integrity check failed");
    }

    Ok(())
}
