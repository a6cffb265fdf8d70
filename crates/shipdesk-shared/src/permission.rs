//! Permission evaluation.
//!
//! A user may perform `(action, resource)` iff any of their roles holds a
//! permission with exactly that pair. There is no wildcard, no resource
//! hierarchy and no deny rule: the check is a plain existence test over the
//! flattened permission set.

use crate::models::User;
use crate::types::Action;

/// Returns `true` iff `user` is present and holds an exact-match permission.
pub fn has_permission(user: Option<&User>, action: Action, resource: &str) -> bool {
    user.is_some_and(|u| user_has_permission(u, action, resource))
}

pub fn user_has_permission(user: &User, action: Action, resource: &str) -> bool {
    user.roles
        .iter()
        .flat_map(|role| role.permissions.iter())
        .any(|p| p.matches(action, resource))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Permission, Role};

    fn user_with(roles: Vec<Vec<(Action, &str)>>) -> User {
        User {
            id: "1".into(),
            username: "tester".into(),
            email: "tester@example.com".into(),
            first_name: None,
            last_name: None,
            roles: roles
                .into_iter()
                .enumerate()
                .map(|(i, perms)| Role {
                    id: i.to_string(),
                    name: format!("ROLE{i}"),
                    permissions: perms
                        .into_iter()
                        .enumerate()
                        .map(|(j, (action, resource))| {
                            Permission::new(j.to_string(), "p", resource, action)
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_unauthenticated_is_always_denied() {
        for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            assert!(!has_permission(None, action, "shipment"));
        }
    }

    #[test]
    fn test_exact_pair_required() {
        let user = user_with(vec![vec![(Action::Read, "shipment")]]);
        assert!(has_permission(Some(&user), Action::Read, "shipment"));
        assert!(!has_permission(Some(&user), Action::Update, "shipment"));
        assert!(!has_permission(Some(&user), Action::Read, "shipments"));
        assert!(!has_permission(Some(&user), Action::Read, "Shipment"));
    }

    #[test]
    fn test_no_resource_hierarchy() {
        let user = user_with(vec![vec![(Action::Update, "service")]]);
        assert!(!has_permission(Some(&user), Action::Update, "service:b2b"));
    }

    #[test]
    fn test_any_role_grants() {
        let user = user_with(vec![
            vec![(Action::Read, "shipment")],
            vec![(Action::Update, "user")],
        ]);
        assert!(has_permission(Some(&user), Action::Update, "user"));
        assert!(has_permission(Some(&user), Action::Read, "shipment"));
        assert!(!has_permission(Some(&user), Action::Read, "user"));
    }

    #[test]
    fn test_exhaustive_pairs_match_membership() {
        let granted = [(Action::Create, "shipment"), (Action::Update, "service:b2c")];
        let user = user_with(vec![granted.to_vec()]);
        let resources = ["shipment", "user", "service:b2c", "service:b2b"];
        for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            for resource in resources {
                let expected = granted.contains(&(action, resource));
                assert_eq!(
                    has_permission(Some(&user), action, resource),
                    expected,
                    "{action} {resource}"
                );
            }
        }
    }
}
