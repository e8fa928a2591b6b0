//! Users, roles and auth payloads

use super::serde_util;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

labeled_enum! {
    /// Role of a signed-in user. Every role except `Borrower` is internal staff.
    pub enum Role as "role" {
        Admin => ("Admin", "Administrador"),
        CreditOfficer => ("CreditOfficer", "Oficial de Crédito"),
        Legal => ("Legal", "Legal"),
        Collections => ("Collections", "Cobros"),
        Borrower => ("Borrower", "Prestatario"),
    }
}

impl Role {
    /// Staff roles
    pub const INTERNAL: &'static [Role] = &[
        Role::Admin,
        Role::CreditOfficer,
        Role::Legal,
        Role::Collections,
    ];

    pub fn is_internal(&self) -> bool {
        !matches!(self, Role::Borrower)
    }
}

/// Role as attached to a user, with its permission map.
///
/// The backend sends either `"role": "Admin"` or
/// `"role": {"id": 1, "name": "Admin", "permissions": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserRoleRepr")]
pub struct UserRole {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Role,
    /// resource -> allowed actions
    pub permissions: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserRoleRepr {
    Name(Role),
    Full {
        #[serde(default, deserialize_with = "serde_util::optional_string_or_number")]
        id: Option<String>,
        name: Role,
        #[serde(default)]
        permissions: BTreeMap<String, Vec<String>>,
    },
}

impl From<UserRoleRepr> for UserRole {
    fn from(repr: UserRoleRepr) -> Self {
        match repr {
            UserRoleRepr::Name(name) => UserRole::new(name),
            UserRoleRepr::Full {
                id,
                name,
                permissions,
            } => UserRole {
                id,
                name,
                permissions,
            },
        }
    }
}

impl UserRole {
    pub fn new(name: Role) -> Self {
        Self {
            id: None,
            name,
            permissions: BTreeMap::new(),
        }
    }

    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.permissions
            .get(resource)
            .map(|actions| actions.iter().any(|a| a == action))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, with = "serde_util::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "serde_util::timestamp")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn role(&self) -> Role {
        self.role.name
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role.name)
    }

    pub fn has_permission(&self, resource: &str, action: &str) -> bool {
        self.role.allows(resource, action)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub remember_me: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login / register response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_labels() {
        assert_eq!("creditofficer".parse::<Role>().unwrap(), Role::CreditOfficer);
        assert_eq!(Role::Collections.label(), "Cobros");
        assert!("Cashier".parse::<Role>().is_err());
        assert!(Role::Legal.is_internal());
        assert!(!Role::Borrower.is_internal());
        assert_eq!(Role::INTERNAL.len(), 4);
    }

    #[test]
    fn test_user_role_as_string() {
        let json = r#"{"id": "u1", "email": "ana@example.gt", "fullName": "Ana", "role": "Legal"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role(), Role::Legal);
        assert!(user.role.permissions.is_empty());
        assert!(!user.is_verified);
    }

    #[test]
    fn test_user_role_as_object() {
        let json = r#"{
            "id": "u2",
            "email": "luis@example.gt",
            "fullName": "Luis",
            "isVerified": true,
            "createdAt": "2026-01-10T08:00:00",
            "role": {"id": 2, "name": "CreditOfficer", "permissions": {"loans": ["read", "create"]}}
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role(), Role::CreditOfficer);
        assert_eq!(user.role.id.as_deref(), Some("2"));
        assert!(user.has_permission("loans", "create"));
        assert!(!user.has_permission("loans", "approve"));
        assert!(!user.has_permission("payments", "read"));
        assert!(user.created_at.is_some());
        assert!(user.has_role(Role::INTERNAL));
    }

    #[test]
    fn test_credentials_serialize() {
        let creds = LoginCredentials {
            email: "a@b.gt".into(),
            password: "secret".into(),
            remember_me: false,
        };
        let json = serde_json::to_value(&creds).unwrap();
        assert!(json.get("rememberMe").is_none());
        assert_eq!(json["email"], "a@b.gt");
    }
}
