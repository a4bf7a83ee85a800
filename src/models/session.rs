use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UserType {
    Caregiver,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Caregiver => "caregiver",
            UserType::Admin => "admin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UserType::Caregiver => "Caregiver User",
            UserType::Admin => "Admin User",
        }
    }
}

impl Default for UserType {
    fn default() -> Self {
        UserType::Caregiver
    }
}

impl std::str::FromStr for UserType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "caregiver" => Ok(UserType::Caregiver),
            "admin" => Ok(UserType::Admin),
            other => Err(anyhow::anyhow!("unknown user type '{other}'")),
        }
    }
}

/// Identity bound to this instance. At most one is active at a time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub patient_id: Option<String>,
}

impl Session {
    pub fn synthesize(email: &str, user_type: UserType) -> Self {
        let patient_id = match user_type {
            UserType::Caregiver => Some("patient123".to_string()),
            UserType::Admin => None,
        };

        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: user_type.display_name().to_string(),
            user_type,
            patient_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caregiver_sessions_are_linked_to_a_patient() {
        let session = Session::synthesize("care@home.org", UserType::Caregiver);
        assert_eq!(session.name, "Caregiver User");
        assert_eq!(session.patient_id.as_deref(), Some("patient123"));

        let admin = Session::synthesize("root@clinic.org", UserType::Admin);
        assert_eq!(admin.name, "Admin User");
        assert!(admin.patient_id.is_none());
    }

    #[test]
    fn serializes_type_and_patient_link() {
        let session = Session::synthesize("a@b.com", UserType::Admin);
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["type"], "admin");
        assert!(json["patientId"].is_null());
    }

    #[test]
    fn parses_user_type_case_insensitively() {
        assert_eq!("Admin".parse::<UserType>().unwrap(), UserType::Admin);
        assert!("nurse".parse::<UserType>().is_err());
    }
}
