//! User entity - represents a user or bot account

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// User as delivered in gateway and REST payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
    #[serde(default)]
    pub system: bool,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub accent_color: Option<u32>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub flags: Option<u64>,
    #[serde(default)]
    pub public_flags: Option<u64>,
}

impl User {
    /// Name to show in logs and mentions
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }

    /// Legacy `name#1234` tag, or the bare username for migrated accounts
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if d != "0" => format!("{}#{d}", self.username),
            _ => self.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_user() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "80351110224678912",
            "username": "nelly",
            "discriminator": "1337",
            "avatar": null
        }))
        .unwrap();

        assert_eq!(user.id, Snowflake::new(80_351_110_224_678_912));
        assert!(!user.bot);
        assert_eq!(user.tag(), "nelly#1337");
        assert_eq!(user.display_name(), "nelly");
    }

    #[test]
    fn test_migrated_username_tag() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "1",
            "username": "nelly",
            "discriminator": "0",
            "global_name": "Nelly",
            "bot": true
        }))
        .unwrap();

        assert_eq!(user.tag(), "nelly");
        assert_eq!(user.display_name(), "Nelly");
        assert!(user.bot);
    }
}
