use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{text_enum, Violations};

text_enum! {
    CollegeType {
        Government => "Government",
        Private => "Private",
        SemiGovernment => "Semi-Government",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollegeLocation {
    pub city: String,
    pub state: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    #[serde(default)]
    pub nirf: Option<i32>,
    #[serde(default)]
    pub qs: Option<i32>,
    pub category: String,
}

/// Category-wise admission cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cutoff {
    pub general: f64,
    pub obc: f64,
    pub sc: f64,
    pub st: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fees {
    pub tuition: f64,
    pub hostel: f64,
    pub other: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionProcess {
    #[serde(rename = "entrance_exams", default)]
    pub entrance_exams: Vec<String>,
    pub cutoff: Cutoff,
    pub fees: Fees,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub website: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placements {
    pub average_package: f64,
    pub highest_package: f64,
    pub placement_percentage: f64,
    #[serde(default)]
    pub top_recruiters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct College {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub college_type: CollegeType,
    pub location: Json<CollegeLocation>,
    pub established_year: i32,
    pub affiliation: String,
    pub courses: Vec<String>,
    pub facilities: Vec<String>,
    pub ranking: Json<Ranking>,
    pub admission_process: Json<AdmissionProcess>,
    pub contact: Json<Contact>,
    pub placements: Json<Placements>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollege {
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub college_type: CollegeType,
    pub location: CollegeLocation,
    pub established_year: i32,
    pub affiliation: String,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
    pub ranking: Ranking,
    pub admission_process: AdmissionProcess,
    pub contact: Contact,
    pub placements: Placements,
}

impl NewCollege {
    pub fn normalized(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_string();
        self.code = self.code.trim().to_uppercase();

        let mut v = Violations::default();
        v.require(&self.name, "College name is required");
        v.max_chars(&self.name, 200, "College name cannot exceed 200 characters");
        v.require(&self.code, "College code is required");
        v.require(&self.location.city, "City is required");
        v.require(&self.location.state, "State is required");
        v.require(&self.affiliation, "Affiliation is required");
        v.require(&self.ranking.category, "Ranking category is required");
        v.check(
            (0.0..=100.0).contains(&self.placements.placement_percentage),
            "Placement percentage must be between 0 and 100",
        );
        v.into_result()?;
        Ok(self)
    }
}
