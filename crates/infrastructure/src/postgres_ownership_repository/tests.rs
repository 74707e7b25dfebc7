use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, Utc};
use ownerscope_application::{OwnershipRepository, TaskListQuery};
use ownerscope_domain::{ProjectId, TaskId, TaskOwnership, TaskStatus, Username, infer_owner};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::PostgresOwnershipRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./test_migrations");
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to apply external schema for ownership tests: {error}");
    }

    Some(pool)
}

fn unique_name(prefix: &str) -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();
    format!("{prefix}-{}-{nanos}-{sequence}", std::process::id())
}

async fn insert_user(pool: &PgPool, username: &str, is_superuser: bool) -> i32 {
    let inserted = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO auth_user (username, is_superuser)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(is_superuser)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(id) => id,
        Err(error) => panic!("failed to insert user '{username}': {error}"),
    }
}

async fn insert_group(pool: &PgPool, name: &str, members: &[i32]) -> i32 {
    let group_id = match sqlx::query_scalar::<_, i32>(
        "INSERT INTO auth_group (name) VALUES ($1) RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    {
        Ok(id) => id,
        Err(error) => panic!("failed to insert group '{name}': {error}"),
    };

    for user_id in members {
        let membership =
            sqlx::query("INSERT INTO auth_user_groups (user_id, group_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(group_id)
                .execute(pool)
                .await;
        assert!(membership.is_ok());
    }

    group_id
}

async fn insert_project(pool: &PgPool, owner_id: i32, name: &str, public: bool) -> i32 {
    let inserted = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO app_project (owner_id, name, public)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(owner_id)
    .bind(name)
    .bind(public)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(id) => id,
        Err(error) => panic!("failed to insert project '{name}': {error}"),
    }
}

async fn insert_task(
    pool: &PgPool,
    project_id: i32,
    name: &str,
    status: Option<i32>,
    days_ago: i64,
) -> Uuid {
    let task_id = Uuid::new_v4();
    let inserted = sqlx::query(
        r#"
        INSERT INTO app_task (id, uuid, project_id, name, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(task_id)
    .bind(unique_name("node-task"))
    .bind(project_id)
    .bind(name)
    .bind(status)
    .bind(Utc::now() - Duration::days(days_ago))
    .execute(pool)
    .await;

    match inserted {
        Ok(_) => task_id,
        Err(error) => panic!("failed to insert task '{name}': {error}"),
    }
}

async fn grant_user(pool: &PgPool, project_id: i32, user_id: i32, codenames: &[&str]) {
    for codename in codenames {
        let granted = sqlx::query(
            r#"
            INSERT INTO app_projectuserobjectpermission (content_object_id, permission_id, user_id)
            SELECT $1, perm.id, $2
            FROM auth_permission AS perm
            WHERE perm.codename = $3
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(codename)
        .execute(pool)
        .await;
        assert!(granted.is_ok_and(|result| result.rows_affected() == 1));
    }
}

async fn grant_group(pool: &PgPool, project_id: i32, group_id: i32, codenames: &[&str]) {
    for codename in codenames {
        let granted = sqlx::query(
            r#"
            INSERT INTO app_projectgroupobjectpermission (content_object_id, permission_id, group_id)
            SELECT $1, perm.id, $2
            FROM auth_permission AS perm
            WHERE perm.codename = $3
            "#,
        )
        .bind(project_id)
        .bind(group_id)
        .bind(codename)
        .execute(pool)
        .await;
        assert!(granted.is_ok_and(|result| result.rows_affected() == 1));
    }
}

fn username(value: &str) -> Username {
    let Ok(username) = Username::new(value) else {
        panic!("username '{value}' must be valid");
    };
    username
}

#[tokio::test]
async fn permission_holders_aggregate_codenames_and_groups() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresOwnershipRepository::new(pool.clone());
    let alice_name = unique_name("alice");
    let bob_name = unique_name("bob");
    let alice = insert_user(&pool, &alice_name, false).await;
    let bob = insert_user(&pool, &bob_name, false).await;
    insert_group(&pool, &unique_name("surveyors"), &[alice]).await;
    let project = insert_project(&pool, alice, "Quarry survey", false).await;
    let task = insert_task(&pool, project, "Orthophoto", Some(40), 2).await;
    grant_user(
        &pool,
        project,
        alice,
        &["add_project", "change_project", "delete_project", "view_project"],
    )
    .await;
    grant_user(&pool, project, bob, &["view_project"]).await;

    let holders = repository
        .list_permission_holders(&[ProjectId::from_i32(project)])
        .await
        .unwrap_or_default();
    assert_eq!(holders.len(), 2);

    let owner = infer_owner(&holders);
    assert_eq!(owner.map(|value| value.username.as_str()), Some(alice_name.as_str()));
    assert_eq!(owner.map(|value| value.permission_count()), Some(4));
    assert_eq!(owner.map(|value| value.groups.len()), Some(1));

    let found = repository.find_task(TaskId::from_uuid(task)).await;
    assert!(found.is_ok());
    let Some(found) = found.unwrap_or_default() else {
        panic!("seeded task {task} must be found");
    };
    assert_eq!(found.id.as_uuid(), task);
    assert_eq!(found.project_name, "Quarry survey");
    assert_eq!(found.status_name(), "COMPLETED");
    assert_eq!(
        TaskOwnership::resolve(found, &holders)
            .owner
            .map(|value| value.username),
        Some(alice_name)
    );
}

#[tokio::test]
async fn missing_task_and_user_are_absent_not_errors() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresOwnershipRepository::new(pool);

    let task = repository
        .find_task(TaskId::from_uuid(Uuid::new_v4()))
        .await;
    assert!(task.is_ok_and(|value| value.is_none()));

    let user = repository.find_user(&username(&unique_name("ghost"))).await;
    assert!(user.is_ok_and(|value| value.is_none()));
}

#[tokio::test]
async fn project_without_permission_rows_has_no_holders() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresOwnershipRepository::new(pool.clone());
    let creator = insert_user(&pool, &unique_name("creator"), false).await;
    let project = insert_project(&pool, creator, "Orphaned", false).await;
    insert_task(&pool, project, "Lonely", Some(10), 0).await;

    let holders = repository
        .list_permission_holders(&[ProjectId::from_i32(project)])
        .await;
    assert!(holders.is_ok_and(|value| value.is_empty()));
}

#[tokio::test]
async fn direct_and_group_permissions_are_separated() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresOwnershipRepository::new(pool.clone());
    let dana_name = unique_name("dana");
    let dana = insert_user(&pool, &dana_name, false).await;
    let outsider = insert_user(&pool, &unique_name("outsider"), false).await;
    let group_name = unique_name("field-team");
    let team = insert_group(&pool, &group_name, &[dana]).await;
    let other_team = insert_group(&pool, &unique_name("other-team"), &[outsider]).await;
    let project = insert_project(&pool, outsider, "Bridge", true).await;
    grant_group(&pool, project, team, &["view_project", "change_project"]).await;
    grant_group(&pool, project, other_team, &["delete_project"]).await;
    grant_user(&pool, project, dana, &["view_project"]).await;

    let Some(account) = repository
        .find_user(&username(&dana_name))
        .await
        .unwrap_or_default()
    else {
        panic!("seeded user must be found");
    };
    assert!(account.groups.contains(&group_name));

    let direct = repository
        .list_direct_permissions(ProjectId::from_i32(project), account.id)
        .await
        .unwrap_or_default();
    assert_eq!(direct.into_iter().collect::<Vec<_>>(), vec!["view_project"]);

    let grants = repository
        .list_group_permissions(ProjectId::from_i32(project), account.id)
        .await
        .unwrap_or_default();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].group_name, group_name);
    assert_eq!(grants[0].permissions.len(), 2);
}

#[tokio::test]
async fn task_listing_filters_by_status_in_creation_order() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresOwnershipRepository::new(pool.clone());
    let creator = insert_user(&pool, &unique_name("lister"), false).await;
    let project = insert_project(&pool, creator, "Listing", false).await;
    let second = insert_task(&pool, project, "second", Some(30), 2).await;
    let first = insert_task(&pool, project, "first", Some(30), 3).await;
    let queued = insert_task(&pool, project, "queued", Some(10), 1).await;

    let query = TaskListQuery {
        status: Some(TaskStatus::Failed),
        ..TaskListQuery::default()
    };
    let tasks = repository.list_tasks(query).await;
    assert!(tasks.is_ok());
    let tasks = tasks.unwrap_or_default();

    assert!(tasks.iter().all(|task| task.status == Some(30)));
    let seeded: Vec<Uuid> = tasks
        .iter()
        .map(|task| task.id.as_uuid())
        .filter(|id| [first, second, queued].contains(id))
        .collect();
    assert_eq!(seeded, vec![first, second]);
}

#[tokio::test]
async fn unbounded_listing_returns_more_than_a_bounded_page() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresOwnershipRepository::new(pool.clone());
    let creator = insert_user(&pool, &unique_name("bulk"), false).await;
    let project = insert_project(&pool, creator, "Bulk", false).await;
    let mut seeded = Vec::new();
    for index in 0..3 {
        seeded.push(insert_task(&pool, project, &format!("bulk-{index}"), Some(40), 0).await);
    }

    let everything = repository
        .list_tasks(TaskListQuery::default())
        .await
        .unwrap_or_default();
    let listed: Vec<Uuid> = everything.iter().map(|task| task.id.as_uuid()).collect();
    assert!(seeded.iter().all(|id| listed.contains(id)));

    let bounded = repository
        .list_tasks(TaskListQuery {
            limit: Some(1),
            ..TaskListQuery::default()
        })
        .await
        .unwrap_or_default();
    assert_eq!(bounded.len(), 1);
    assert!(everything.len() >= 3);
}
