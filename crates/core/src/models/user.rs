//! Users and account forms.

use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

/// A user as listed by `GET /users`. The API never returns passwords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "id_usuario", alias = "id")]
    pub id: UserId,
    #[serde(rename = "nombre", default)]
    pub first_name: String,
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "ciudad", default)]
    pub city: String,
    #[serde(rename = "codigo_postal", default)]
    pub postal_code: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// The `user` object of the login response, kept in the session.
///
/// Older API builds send `id`, newer ones `id_usuario`; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "id", alias = "id_usuario")]
    pub id: UserId,
    #[serde(rename = "nombre", default)]
    pub first_name: String,
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "ciudad", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "codigo_postal", default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl SessionUser {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// Merge an accepted profile edit so the header and checkout prefill
    /// see it without a new login.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        fn set(target: &mut String, value: Option<&String>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
        fn set_optional(target: &mut Option<String>, value: Option<&String>) {
            if value.is_some() {
                *target = value.cloned();
            }
        }

        set(&mut self.first_name, update.first_name.as_ref());
        set(&mut self.last_name, update.last_name.as_ref());
        set(&mut self.email, update.email.as_ref());
        set(&mut self.username, update.username.as_ref());
        set_optional(&mut self.phone, update.phone.as_ref());
        set_optional(&mut self.address, update.address.as_ref());
        set_optional(&mut self.city, update.city.as_ref());
        set_optional(&mut self.postal_code, update.postal_code.as_ref());
    }
}

/// Body for `POST /users/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub dni: String,
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "codigo_postal")]
    pub postal_code: String,
}

/// Body for `PATCH /users/{id}` from the settings page. Absent fields are
/// left untouched by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "ciudad", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "codigo_postal", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_accepts_either_id() {
        let a: SessionUser =
            serde_json::from_str(r#"{"id": 4, "nombre": "Juan", "role": "admin"}"#).unwrap();
        let b: SessionUser = serde_json::from_str(r#"{"id_usuario": 4, "nombre": "Juan"}"#).unwrap();
        assert_eq!(a.id, b.id);
        assert!(a.role.is_admin());
        assert_eq!(b.role, Role::User);
    }

    #[test]
    fn test_profile_update_only_sends_present_fields() {
        let update = ProfileUpdate {
            password: Some("Secreta1".to_owned()),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"password":"Secreta1"}"#
        );
    }

    #[test]
    fn test_user_full_name() {
        let user: User = serde_json::from_str(
            r#"{"id_usuario": 2, "nombre": "Lucía", "apellido": "Gómez", "role": "user"}"#,
        )
        .unwrap();
        assert_eq!(user.full_name(), "Lucía Gómez");
    }

    #[test]
    fn test_apply_profile_update_keeps_absent_fields() {
        let mut user: SessionUser = serde_json::from_str(
            r#"{"id": 3, "nombre": "Ana", "apellido": "Paz", "email": "ana@correo.com", "ciudad": "Córdoba"}"#,
        )
        .unwrap();
        user.apply(&ProfileUpdate {
            last_name: Some("Sosa".to_owned()),
            phone: Some("3515550000".to_owned()),
            ..ProfileUpdate::default()
        });
        assert_eq!(user.full_name(), "Ana Sosa");
        assert_eq!(user.phone.as_deref(), Some("3515550000"));
        assert_eq!(user.city.as_deref(), Some("Córdoba"));
    }
}
