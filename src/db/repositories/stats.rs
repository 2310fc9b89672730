use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Serialize;

use crate::entities::prelude::*;

/// Row counts per entity, the offline counterpart of the dashboard numbers.
#[derive(Debug, Clone, Serialize)]
pub struct EntityCounts {
    pub students: u64,
    pub teachers: u64,
    pub programs: u64,
    pub departments: u64,
    pub academic_years: u64,
    pub enrollments: u64,
    pub attendance: u64,
    pub users: u64,
}

pub struct StatsRepository {
    conn: DatabaseConnection,
}

impl StatsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn counts(&self) -> Result<EntityCounts> {
        Ok(EntityCounts {
            students: Students::find()
                .count(&self.conn)
                .await
                .context("Failed to count students")?,
            teachers: Teachers::find()
                .count(&self.conn)
                .await
                .context("Failed to count teachers")?,
            programs: Programs::find()
                .count(&self.conn)
                .await
                .context("Failed to count programs")?,
            departments: Departments::find()
                .count(&self.conn)
                .await
                .context("Failed to count departments")?,
            academic_years: AcademicYears::find()
                .count(&self.conn)
                .await
                .context("Failed to count academic years")?,
            enrollments: Enrollments::find()
                .count(&self.conn)
                .await
                .context("Failed to count enrollments")?,
            attendance: Attendance::find()
                .count(&self.conn)
                .await
                .context("Failed to count attendance records")?,
            users: Users::find()
                .count(&self.conn)
                .await
                .context("Failed to count users")?,
        })
    }
}
