//! Migration status command handler

use sea_orm_migration::MigratorTrait;

use crate::config::Config;
use crate::db::{Store, migrator::Migrator};

pub async fn cmd_status(config: &Config) -> anyhow::Result<()> {
    let store = Store::from_config(config).await?;

    let applied = Migrator::get_applied_migrations(&store.conn).await?;
    let pending = Migrator::get_pending_migrations(&store.conn).await?;

    println!("Migration Status");
    println!("{:-<60}", "");

    if applied.is_empty() {
        println!("No migrations applied yet.");
    } else {
        println!("Applied ({}):", applied.len());
        for migration in &applied {
            println!("  ✓ {}", migration.name());
        }
    }

    println!();
    if pending.is_empty() {
        println!("Database is up to date.");
    } else {
        println!("Pending ({}):", pending.len());
        for migration in &pending {
            println!("  ○ {}", migration.name());
        }
        println!();
        println!("Run 'registrar migrate' to apply them.");
    }

    Ok(())
}
