use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Different privilege levels.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Voter,
    Admin,
}

impl Display for UserType {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::Voter => "voter",
                Self::Admin => "admin",
            }
        )
    }
}

/// An administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub admin_id: String,
    pub username: String,
    pub email: String,
}

/// A registered voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub voter_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub has_voted: bool,
    #[serde(default)]
    pub voted_at: Option<String>,
}

/// Whoever is signed in. Persisted as `{"user": ..., "type": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "user", rename_all = "lowercase")]
pub enum UserProfile {
    Admin(Admin),
    Voter(Voter),
}

impl UserProfile {
    pub fn user_type(&self) -> UserType {
        match self {
            Self::Admin(_) => UserType::Admin,
            Self::Voter(_) => UserType::Voter,
        }
    }

    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Admin(admin) => &admin.username,
            Self::Voter(voter) if !voter.name.is_empty() => &voter.name,
            Self::Voter(_) => "Voter",
        }
    }

    pub fn as_voter(&self) -> Option<&Voter> {
        match self {
            Self::Voter(voter) => Some(voter),
            Self::Admin(_) => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn profile_persists_with_type_tag() {
        let profile = UserProfile::Voter(Voter::example());
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["type"], json!("voter"));
        assert_eq!(value["user"]["voter_id"], json!("VTR-1"));

        let back: UserProfile = serde_json::from_value(value).unwrap();
        assert_eq!(back.user_type(), UserType::Voter);
        assert_eq!(back.display_name(), "Ada Obi");
    }
}
