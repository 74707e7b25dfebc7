use super::*;

impl PostgresOwnershipRepository {
    pub(super) async fn find_user_impl(&self, username: &Username) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                u.id AS user_id,
                u.username::TEXT AS username,
                u.is_superuser,
                COALESCE(
                    ARRAY_AGG(DISTINCT g.name::TEXT) FILTER (WHERE g.name IS NOT NULL),
                    ARRAY[]::TEXT[]
                ) AS groups
            FROM auth_user AS u
            LEFT JOIN auth_user_groups AS ug
                ON ug.user_id = u.id
            LEFT JOIN auth_group AS g
                ON g.id = ug.group_id
            WHERE u.username = $1
            GROUP BY u.id, u.username, u.is_superuser
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| database_error(&format!("failed to find user '{username}'"), error))?;

        Ok(row.map(UserAccount::from))
    }
}
