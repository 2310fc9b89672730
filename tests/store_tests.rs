//! Integration tests for the store and repositories.

use registrar::db::{NewStudent, Store};
use registrar::db::migrator::Migrator;
use registrar::entities::{departments, programs, users};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;

fn temp_db_url(label: &str) -> String {
    let db_path =
        std::env::temp_dir().join(format!("registrar-{}-{}.db", label, uuid::Uuid::new_v4()));
    format!("sqlite:{}", db_path.display())
}

async fn migrated_store(label: &str) -> Store {
    Store::connect_and_migrate(&temp_db_url(label))
        .await
        .expect("failed to open store")
}

fn new_student(first: &str, last: &str, email: &str) -> NewStudent {
    NewStudent {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        program_id: None,
        enrolled_at: Some("2024-09-01".to_string()),
    }
}

async fn seed_user_with_username(store: &Store, email: &str, username: Option<&str>) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let active = users::ActiveModel {
        email: Set(email.to_string()),
        username: Set(username.map(ToString::to_string)),
        password_hash: Set("irrelevant".to_string()),
        role: Set("staff".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    active.insert(&store.conn).await.expect("insert user").id
}

#[tokio::test]
async fn test_ping() {
    let store = migrated_store("ping").await;
    store.ping().await.expect("ping failed");
}

#[tokio::test]
async fn test_student_roundtrip() {
    let store = migrated_store("students").await;

    let id = store
        .add_student(&new_student("Jane", "Doe", "jane.doe@student.example"))
        .await
        .expect("add student");

    let student = store
        .get_student(id)
        .await
        .expect("get student")
        .expect("student missing");
    assert_eq!(student.first_name, "Jane");
    assert_eq!(student.status, "active");

    let by_email = store
        .student_repo()
        .get_by_email("jane.doe@student.example")
        .await
        .expect("get by email")
        .expect("student missing");
    assert_eq!(by_email.id, id);

    assert_eq!(store.count_students().await.unwrap(), 1);
}

#[tokio::test]
async fn test_student_list_is_name_ordered() {
    let store = migrated_store("ordering").await;

    store
        .add_student(&new_student("Zoe", "Young", "zy@student.example"))
        .await
        .unwrap();
    store
        .add_student(&new_student("Adam", "Abbott", "aa@student.example"))
        .await
        .unwrap();
    store
        .add_student(&new_student("Ben", "Abbott", "ba@student.example"))
        .await
        .unwrap();

    let names: Vec<(String, String)> = store
        .list_students()
        .await
        .unwrap()
        .into_iter()
        .map(|s| (s.last_name, s.first_name))
        .collect();

    assert_eq!(
        names,
        vec![
            ("Abbott".to_string(), "Adam".to_string()),
            ("Abbott".to_string(), "Ben".to_string()),
            ("Young".to_string(), "Zoe".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_set_username_and_lookup() {
    let store = migrated_store("usernames").await;

    let id = seed_user_with_username(&store, "mark.lee@school.example", None).await;
    store.set_username(id, "marklee").await.expect("set");

    let user = store
        .get_user_by_username("marklee")
        .await
        .expect("lookup")
        .expect("user missing");
    assert_eq!(user.id, id);
    assert_eq!(user.email, "mark.lee@school.example");
}

#[tokio::test]
async fn test_entity_counts() {
    let store = migrated_store("counts").await;

    let now = chrono::Utc::now().to_rfc3339();
    let department = departments::ActiveModel {
        name: Set("Computer Science".to_string()),
        code: Set("CS".to_string()),
        created_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&store.conn)
    .await
    .expect("insert department");

    programs::ActiveModel {
        name: Set("Software Engineering".to_string()),
        code: Set("SE".to_string()),
        department_id: Set(department.id),
        duration_years: Set(3),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&store.conn)
    .await
    .expect("insert program");

    store
        .add_student(&new_student("Jane", "Doe", "jd@student.example"))
        .await
        .unwrap();
    store
        .add_student(&new_student("John", "Roe", "jr@student.example"))
        .await
        .unwrap();

    let counts = store.entity_counts().await.expect("counts");
    assert_eq!(counts.students, 2);
    assert_eq!(counts.departments, 1);
    assert_eq!(counts.programs, 1);
    assert_eq!(counts.teachers, 0);
    // The seeded admin account.
    assert_eq!(counts.users, 1);
}

#[tokio::test]
async fn test_duplicate_probe_and_manual_fix() {
    let store = Store::connect(&temp_db_url("duplicates"))
        .await
        .expect("open store");
    Migrator::up(&store.conn, Some(1))
        .await
        .expect("initial migration");

    // No unique index yet, so conflicting usernames can exist, as they
    // would after a race in the legacy script.
    let kept = seed_user_with_username(&store, "dup.one@example.com", Some("dup")).await;
    let clashing = seed_user_with_username(&store, "dup.two@example.com", Some("dup")).await;

    let duplicates = store.duplicate_usernames().await.expect("probe");
    assert_eq!(duplicates, vec![("dup".to_string(), 2)]);

    // The constraint finalizer must fail loudly on the residual duplicate.
    assert!(Migrator::up(&store.conn, None).await.is_err());

    // Manual fix: release one of the clashing rows, then re-run.
    let row = users::Entity::find_by_id(clashing)
        .one(&store.conn)
        .await
        .expect("query")
        .expect("row missing");
    let mut active: users::ActiveModel = row.into();
    active.username = Set(None);
    active.update(&store.conn).await.expect("release username");

    Migrator::up(&store.conn, None).await.expect("re-run");

    assert!(store.duplicate_usernames().await.unwrap().is_empty());
    let kept_user = store.user_repo().get_by_id(kept).await.unwrap().unwrap();
    assert_eq!(kept_user.username.as_deref(), Some("dup"));
    let fixed = store.user_repo().get_by_id(clashing).await.unwrap().unwrap();
    assert_eq!(fixed.username.as_deref(), Some("duptwo"));
}
