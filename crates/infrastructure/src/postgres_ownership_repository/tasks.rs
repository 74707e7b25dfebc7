use super::*;

const TASK_COLUMNS: &str = r#"
    SELECT
        t.id AS task_id,
        t.uuid::TEXT AS task_uuid,
        t.name::TEXT AS task_name,
        t.status AS task_status,
        t.created_at,
        p.id AS project_id,
        p.name::TEXT AS project_name,
        p.public AS project_public
    FROM app_task AS t
    INNER JOIN app_project AS p
        ON p.id = t.project_id
"#;

impl PostgresOwnershipRepository {
    pub(super) async fn list_tasks_impl(&self, query: TaskListQuery) -> AppResult<Vec<TaskRecord>> {
        let sql = format!(
            r#"{TASK_COLUMNS}
            WHERE ($1::INTEGER IS NULL OR t.status = $1)
            ORDER BY t.created_at, t.id
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, TaskRow>(sql.as_str())
            .bind(query.status.map(|status| status.code()))
            // A NULL limit returns every remaining row.
            .bind(query.limit.map(|limit| i64::try_from(limit).unwrap_or(i64::MAX)))
            .bind(i64::try_from(query.offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|error| database_error("failed to list tasks", error))?;

        Ok(rows.into_iter().map(TaskRecord::from).collect())
    }

    pub(super) async fn find_task_impl(&self, task_id: TaskId) -> AppResult<Option<TaskRecord>> {
        let sql = format!(
            r#"{TASK_COLUMNS}
            WHERE t.id = $1
            "#
        );

        let row = sqlx::query_as::<_, TaskRow>(sql.as_str())
            .bind(task_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| database_error(&format!("failed to find task '{task_id}'"), error))?;

        Ok(row.map(TaskRecord::from))
    }
}
