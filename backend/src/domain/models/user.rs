use serde::{Deserialize, Serialize};

pub const DEFAULT_PHONE: &str = "+221 77 123 45 67";
pub const DEFAULT_LOCATION: &str = "Dakar, Sénégal";
pub const DEFAULT_DATE_OF_BIRTH: &str = "1990-01-15";
pub const DEFAULT_BIO: &str = "Passionné par ma santé et le bien-être";

/// Signed-in patient. Persisted as JSON under the session key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default, alias = "dateOfBirth")]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Profile view of a user with every field filled in
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub date_of_birth: String,
    pub bio: String,
}

impl Profile {
    pub fn from_user(user: &User) -> Self {
        fn or_default(value: &Option<String>, default: &str) -> String {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
                .to_string()
        }

        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: or_default(&user.phone, DEFAULT_PHONE),
            location: or_default(&user.location, DEFAULT_LOCATION),
            date_of_birth: or_default(&user.date_of_birth, DEFAULT_DATE_OF_BIRTH),
            bio: or_default(&user.bio, DEFAULT_BIO),
        }
    }
}
