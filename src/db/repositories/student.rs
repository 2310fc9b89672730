use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::students;

/// Fields required to register a student.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub program_id: Option<i32>,
    pub enrolled_at: Option<String>,
}

pub struct StudentRepository {
    conn: DatabaseConnection,
}

impl StudentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, student: &NewStudent) -> Result<i32> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = students::ActiveModel {
            first_name: Set(student.first_name.clone()),
            last_name: Set(student.last_name.clone()),
            email: Set(student.email.clone()),
            program_id: Set(student.program_id),
            status: Set("active".to_string()),
            enrolled_at: Set(student.enrolled_at.clone()),
            created_at: Set(now),
            ..Default::default()
        };

        let inserted = active
            .insert(&self.conn)
            .await
            .context("Failed to insert student")?;

        Ok(inserted.id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<students::Model>> {
        let student = students::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query student by ID")?;

        Ok(student)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<students::Model>> {
        let student = students::Entity::find()
            .filter(students::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query student by email")?;

        Ok(student)
    }

    pub async fn list(&self) -> Result<Vec<students::Model>> {
        let students = students::Entity::find()
            .order_by_asc(students::Column::LastName)
            .order_by_asc(students::Column::FirstName)
            .all(&self.conn)
            .await
            .context("Failed to list students")?;

        Ok(students)
    }

    pub async fn count(&self) -> Result<u64> {
        let count = students::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count students")?;

        Ok(count)
    }
}
