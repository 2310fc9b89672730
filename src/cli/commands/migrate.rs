//! Migrate command handler

use sea_orm_migration::MigratorTrait;

use crate::config::Config;
use crate::db::{Store, migrator::Migrator};

pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    let store = Store::from_config(config).await?;

    let pending = Migrator::get_pending_migrations(&store.conn).await?;

    if pending.is_empty() {
        println!("Database is up to date.");
        return Ok(());
    }

    println!("Applying {} migration(s):", pending.len());
    for migration in &pending {
        println!("  • {}", migration.name());
    }

    store.migrate().await?;

    println!();
    println!("✓ Migrations applied.");

    Ok(())
}
