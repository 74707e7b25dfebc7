use std::collections::BTreeSet;

use crate::{TaskRecord, UserId};

/// User account as stored by the external application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Account key.
    pub id: UserId,
    /// Account name.
    pub username: String,
    /// Whether the account is a superuser.
    pub is_superuser: bool,
    /// Names of the groups the account belongs to.
    pub groups: BTreeSet<String>,
}

/// Permissions a group holds on a project.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupPermissionGrant {
    /// Group name.
    pub group_name: String,
    /// Distinct permission codenames granted to the group.
    pub permissions: BTreeSet<String>,
}

/// Outcome of an access check for one user and one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    /// Whether any permission row links the user to the task's project.
    pub has_access: bool,
    /// Codenames granted to the user directly.
    pub direct_permissions: BTreeSet<String>,
    /// Grants reaching the user through group membership.
    pub group_permissions: Vec<GroupPermissionGrant>,
    /// Whether the user is a superuser.
    pub is_superuser: bool,
    /// Whether the task's project is public.
    pub is_public_project: bool,
    /// Human-readable reasons for the decision.
    pub access_type: Vec<String>,
}

impl AccessDecision {
    /// Derives the decision from the permission rows found for the user.
    ///
    /// Only permission rows grant access. Superuser status and project
    /// visibility are reported but do not change `has_access`.
    #[must_use]
    pub fn evaluate(
        user: &UserAccount,
        task: &TaskRecord,
        direct_permissions: BTreeSet<String>,
        mut group_permissions: Vec<GroupPermissionGrant>,
    ) -> Self {
        group_permissions.retain(|grant| {
            user.groups.contains(&grant.group_name) && !grant.permissions.is_empty()
        });
        group_permissions.sort();

        let mut access_type = Vec::new();
        if !direct_permissions.is_empty() {
            access_type.push(format!(
                "direct permissions: {}",
                join(direct_permissions.iter())
            ));
        }
        if !group_permissions.is_empty() {
            let described: Vec<String> = group_permissions
                .iter()
                .map(|grant| format!("{}: {}", grant.group_name, join(grant.permissions.iter())))
                .collect();
            access_type.push(format!("group permissions: {}", described.join("; ")));
        }

        let has_access = !access_type.is_empty();
        if !has_access {
            access_type.push("no access".to_owned());
        }

        Self {
            has_access,
            direct_permissions,
            group_permissions,
            is_superuser: user.is_superuser,
            is_public_project: task.project_is_public,
            access_type,
        }
    }
}

fn join<'a>(values: impl Iterator<Item = &'a String>) -> String {
    values.map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;
    use uuid::Uuid;

    use super::{AccessDecision, GroupPermissionGrant, UserAccount};
    use crate::{ProjectId, TaskId, TaskRecord, UserId};

    fn task(project_is_public: bool) -> TaskRecord {
        TaskRecord {
            id: TaskId::from_uuid(Uuid::from_u128(42)),
            uuid: "5b1f0c2e-4c55-4f7e-9a43-0d2f6c1f9e10".to_owned(),
            name: Some("Orthophoto".to_owned()),
            project_id: ProjectId::from_i32(3),
            project_name: "Quarry".to_owned(),
            project_is_public,
            status: Some(40),
            created_at: Utc::now(),
        }
    }

    fn user(groups: &[&str], is_superuser: bool) -> UserAccount {
        UserAccount {
            id: UserId::from_i32(11),
            username: "carol".to_owned(),
            is_superuser,
            groups: groups.iter().map(|value| (*value).to_owned()).collect(),
        }
    }

    fn codenames(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn direct_permission_grants_access() {
        let decision = AccessDecision::evaluate(
            &user(&[], false),
            &task(false),
            codenames(&["view_project", "change_project"]),
            Vec::new(),
        );

        assert!(decision.has_access);
        assert_eq!(
            decision.access_type,
            vec!["direct permissions: change_project, view_project".to_owned()]
        );
    }

    #[test]
    fn group_permission_grants_access_only_for_member_groups() {
        let grants = vec![
            GroupPermissionGrant {
                group_name: "surveyors".to_owned(),
                permissions: codenames(&["view_project"]),
            },
            GroupPermissionGrant {
                group_name: "admins".to_owned(),
                permissions: codenames(&["delete_project"]),
            },
        ];

        let decision =
            AccessDecision::evaluate(&user(&["surveyors"], false), &task(false), BTreeSet::new(), grants);

        assert!(decision.has_access);
        assert_eq!(decision.group_permissions.len(), 1);
        assert_eq!(
            decision.access_type,
            vec!["group permissions: surveyors: view_project".to_owned()]
        );
    }

    #[test]
    fn superuser_and_public_project_are_reported_without_granting() {
        let decision =
            AccessDecision::evaluate(&user(&[], true), &task(true), BTreeSet::new(), Vec::new());

        assert!(!decision.has_access);
        assert!(decision.is_superuser);
        assert!(decision.is_public_project);
        assert_eq!(decision.access_type, vec!["no access".to_owned()]);
    }
}
