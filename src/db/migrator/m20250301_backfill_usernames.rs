use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{Expr, Order, Query};
use tracing::info;

use crate::db::username::{UsernameAllocator, derive_base};

#[derive(DeriveMigrationName)]
pub struct Migration;

const UNIQUE_INDEX: &str = "ux_users_username";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.has_column("users", "username").await? {
            info!("username column already exists");
        } else {
            info!("adding username column to users");
            manager
                .alter_table(
                    Table::alter()
                        .table(Users::Table)
                        .add_column(ColumnDef::new(Users::Username).string().null())
                        .to_owned(),
                )
                .await?;
        }

        let conn = manager.get_connection();
        let backend = manager.get_database_backend();

        // Rows that still need a username. A run aborted mid-loop resumes
        // here: already-backfilled rows are never rewritten.
        let pending = Query::select()
            .columns([Users::Id, Users::Email])
            .from(Users::Table)
            .and_where(Expr::col(Users::Username).is_null())
            .order_by(Users::Id, Order::Asc)
            .to_owned();
        let pending_rows = conn.query_all(backend.build(&pending)).await?;

        if pending_rows.is_empty() {
            info!("no users require username backfill");
        } else {
            // Existing usernames, read once. Candidates are resolved against
            // this set instead of one query per candidate.
            let taken_query = Query::select()
                .column(Users::Username)
                .from(Users::Table)
                .and_where(Expr::col(Users::Username).is_not_null())
                .to_owned();
            let taken_rows = conn.query_all(backend.build(&taken_query)).await?;
            let taken = taken_rows
                .iter()
                .map(|row| row.try_get::<String>("", "username"))
                .collect::<Result<Vec<_>, _>>()?;

            let mut allocator = UsernameAllocator::new(taken);

            for row in &pending_rows {
                let id: i32 = row.try_get("", "id")?;
                let email: String = row.try_get("", "email")?;

                let username = allocator.allocate(&derive_base(&email));

                let update = Query::update()
                    .table(Users::Table)
                    .value(Users::Username, username.clone())
                    .and_where(Expr::col(Users::Id).eq(id))
                    .to_owned();
                manager.exec_stmt(update).await?;

                info!(user_id = id, username = %username, "backfilled username");
            }

            info!("backfilled {} usernames", pending_rows.len());
        }

        // The authoritative uniqueness guarantee. A residual duplicate makes
        // this fail loudly.
        if !manager.has_index("users", UNIQUE_INDEX).await? {
            manager
                .create_index(
                    Index::create()
                        .name(UNIQUE_INDEX)
                        .table(Users::Table)
                        .col(Users::Username)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.has_index("users", UNIQUE_INDEX).await? {
            manager
                .drop_index(
                    Index::drop()
                        .name(UNIQUE_INDEX)
                        .table(Users::Table)
                        .to_owned(),
                )
                .await?;
        }

        if manager.has_column("users", "username").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Users::Table)
                        .drop_column(Users::Username)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
}
