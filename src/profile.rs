use serde::Serialize;
use utoipa::ToSchema;

use crate::schema::User;

/// Public part of a user record. Only these fields are ever serialized.
#[derive(Debug, Serialize, ToSchema)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub uuid: String,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            uuid: user.uuid,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    #[test]
    fn drops_everything_outside_the_allow_list() {
        let user = User {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            uuid: "u-42".to_string(),
            attributes: BTreeMap::from([
                ("role".to_string(), json!("admin")),
                ("password_digest".to_string(), json!("$2a$10$...")),
            ]),
        };

        let body = serde_json::to_string(&Profile::from(user)).unwrap();

        assert_eq!(
            body,
            r#"{"name":"Ada","email":"ada@example.com","uuid":"u-42"}"#
        );
    }
}
