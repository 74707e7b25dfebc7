use super::*;

impl PostgresOwnershipRepository {
    pub(super) async fn list_permission_holders_impl(
        &self,
        project_ids: &[ProjectId],
    ) -> AppResult<Vec<PermissionHolder>> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }

        let project_keys: Vec<i32> = project_ids.iter().map(ProjectId::as_i32).collect();
        let rows = sqlx::query_as::<_, PermissionHolderRow>(
            r#"
            SELECT
                puop.content_object_id AS project_id,
                u.id AS user_id,
                u.username::TEXT AS username,
                ARRAY_AGG(DISTINCT perm.codename::TEXT) AS permissions,
                COALESCE(
                    ARRAY_AGG(DISTINCT g.name::TEXT) FILTER (WHERE g.name IS NOT NULL),
                    ARRAY[]::TEXT[]
                ) AS groups
            FROM app_projectuserobjectpermission AS puop
            INNER JOIN auth_user AS u
                ON u.id = puop.user_id
            INNER JOIN auth_permission AS perm
                ON perm.id = puop.permission_id
            LEFT JOIN auth_user_groups AS ug
                ON ug.user_id = u.id
            LEFT JOIN auth_group AS g
                ON g.id = ug.group_id
            WHERE puop.content_object_id = ANY($1)
            GROUP BY puop.content_object_id, u.id, u.username
            ORDER BY puop.content_object_id, u.id
            "#,
        )
        .bind(project_keys)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| database_error("failed to list permission holders", error))?;

        Ok(rows.into_iter().map(PermissionHolder::from).collect())
    }

    pub(super) async fn list_direct_permissions_impl(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> AppResult<BTreeSet<String>> {
        let codenames = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT perm.codename::TEXT
            FROM app_projectuserobjectpermission AS puop
            INNER JOIN auth_permission AS perm
                ON perm.id = puop.permission_id
            WHERE puop.content_object_id = $1
                AND puop.user_id = $2
            "#,
        )
        .bind(project_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            database_error(
                &format!("failed to load direct permissions on project '{project_id}'"),
                error,
            )
        })?;

        Ok(codenames.into_iter().collect())
    }

    pub(super) async fn list_group_permissions_impl(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> AppResult<Vec<GroupPermissionGrant>> {
        let rows = sqlx::query_as::<_, GroupPermissionRow>(
            r#"
            SELECT
                g.name::TEXT AS group_name,
                ARRAY_AGG(DISTINCT perm.codename::TEXT) AS permissions
            FROM app_projectgroupobjectpermission AS pgop
            INNER JOIN auth_group AS g
                ON g.id = pgop.group_id
            INNER JOIN auth_user_groups AS ug
                ON ug.group_id = g.id
            INNER JOIN auth_permission AS perm
                ON perm.id = pgop.permission_id
            WHERE pgop.content_object_id = $1
                AND ug.user_id = $2
            GROUP BY g.name
            ORDER BY g.name
            "#,
        )
        .bind(project_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            database_error(
                &format!("failed to load group permissions on project '{project_id}'"),
                error,
            )
        })?;

        Ok(rows.into_iter().map(GroupPermissionGrant::from).collect())
    }
}
