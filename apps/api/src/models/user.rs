use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{text_enum, Stream, Violations};

/// bcrypt work factor for stored password hashes.
pub const PASSWORD_HASH_COST: u32 = 12;
const MIN_PASSWORD_CHARS: usize = 8;

// `\w` and `\d` are ASCII-only here.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("valid email regex")
});
static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)^\d{6}$").expect("valid pincode regex"));

text_enum! {
    Gender {
        Male => "male",
        Female => "female",
        Other => "other",
    }
}

text_enum! {
    EducationLevel {
        Class10 => "class10",
        Class12 => "class12",
        Graduate => "graduate",
        Postgraduate => "postgraduate",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub state: String,
    pub district: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub education_level: EducationLevel,
    pub interests: Vec<String>,
    pub location: Json<Location>,
    pub preferred_streams: Json<Vec<Stream>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Compares a candidate password against the stored hash.
    /// Runs on the blocking pool since bcrypt is deliberately slow.
    pub async fn verify_password(&self, candidate: &str) -> Result<bool, AppError> {
        let hash = self.password_hash.clone();
        let candidate = candidate.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &hash))
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .map_err(|e| AppError::Internal(e.into()))
    }
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub education_level: EducationLevel,
    #[serde(default)]
    pub interests: Vec<String>,
    pub location: Location,
    #[serde(default)]
    pub preferred_streams: Vec<Stream>,
}

impl NewUser {
    /// Trims and lower-cases the fields the schema normalizes, then validates.
    pub fn normalized(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.interests = self
            .interests
            .iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::default();
        v.require(&self.name, "Name is required");
        v.max_chars(&self.name, 100, "Name cannot exceed 100 characters");
        v.require(&self.email, "Email is required");
        v.check(
            self.email.is_empty() || EMAIL_RE.is_match(&self.email),
            "Please enter a valid email",
        );
        v.check(
            self.password.chars().count() >= MIN_PASSWORD_CHARS,
            "Password must be at least 8 characters long",
        );
        v.require(&self.location.state, "State is required");
        v.require(&self.location.district, "District is required");
        if let Some(pincode) = &self.location.pincode {
            v.check(
                PINCODE_RE.is_match(pincode),
                "Please enter a valid 6-digit pincode",
            );
        }
        v.into_result()
    }
}

/// One-way hash of a plaintext password.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, PASSWORD_HASH_COST))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Internal(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            name: "  Asha Verma ".to_string(),
            email: " Asha.Verma@Example.com ".to_string(),
            password: "correct horse".to_string(),
            date_of_birth: None,
            gender: Some(Gender::Female),
            education_level: EducationLevel::Class12,
            interests: vec![" robotics ".to_string(), "  ".to_string()],
            location: Location {
                state: "Karnataka".to_string(),
                district: "Bengaluru Urban".to_string(),
                pincode: Some("560001".to_string()),
            },
            preferred_streams: vec![Stream::Engineering],
        }
    }

    #[test]
    fn test_normalized_trims_and_lowercases() {
        let user = new_user().normalized().unwrap();
        assert_eq!(user.name, "Asha Verma");
        assert_eq!(user.email, "asha.verma@example.com");
        assert_eq!(user.interests, vec!["robotics".to_string()]);
    }

    #[test]
    fn test_short_password_rejected() {
        let mut user = new_user();
        user.password = "short".to_string();
        let err = user.normalized().unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"));
    }

    #[test]
    fn test_bad_pincode_rejected() {
        let mut user = new_user();
        user.location.pincode = Some("56001A".to_string());
        assert!(user.clone().normalized().is_err());

        // Devanagari digits are not ASCII digits
        user.location.pincode = Some("५६०००१".to_string());
        assert!(user.normalized().is_err());
    }

    #[test]
    fn test_email_pattern() {
        assert!(EMAIL_RE.is_match("a.b-c@mail.example.in"));
        assert!(EMAIL_RE.is_match("first_last@uni.ac.in"));
        assert!(!EMAIL_RE.is_match("no-at-sign.example.com"));
        assert!(!EMAIL_RE.is_match("user@localhost"));
        assert!(!EMAIL_RE.is_match("user@example.comm"));
        assert!(!EMAIL_RE.is_match("user..x@example.com"));
        assert!(!EMAIL_RE.is_match("ü@x.de"));
    }

    #[test]
    fn test_education_level_literal() {
        let level: EducationLevel = serde_json::from_str("\"postgraduate\"").unwrap();
        assert_eq!(level, EducationLevel::Postgraduate);
    }

    #[tokio::test]
    async fn test_password_hash_verifies_only_original() {
        let hash = hash_password("correct horse").await.unwrap();
        assert!(hash.starts_with("$2"));
        assert!(hash.contains("$12$"));

        let user = User {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: hash,
            date_of_birth: None,
            gender: None,
            education_level: EducationLevel::Graduate,
            interests: vec![],
            location: Json(Location {
                state: "Kerala".to_string(),
                district: "Kochi".to_string(),
                pincode: None,
            }),
            preferred_streams: Json(vec![]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(user.verify_password("correct horse").await.unwrap());
        assert!(!user.verify_password("wrong horse").await.unwrap());

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
    }
}
