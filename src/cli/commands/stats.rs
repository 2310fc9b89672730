//! Entity statistics command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_stats(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = Store::from_config(config).await?;

    let counts = store.entity_counts().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    println!("Entity Counts");
    println!("{:-<40}", "");
    println!("Students:        {:>8}", counts.students);
    println!("Teachers:        {:>8}", counts.teachers);
    println!("Programs:        {:>8}", counts.programs);
    println!("Departments:     {:>8}", counts.departments);
    println!("Academic years:  {:>8}", counts.academic_years);
    println!("Enrollments:     {:>8}", counts.enrollments);
    println!("Attendance:      {:>8}", counts.attendance);
    println!("Users:           {:>8}", counts.users);

    Ok(())
}
