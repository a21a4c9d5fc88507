use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{text_enum, Violations};

text_enum! {
    CourseCategory {
        Engineering => "Engineering",
        Medical => "Medical",
        Business => "Business",
        Arts => "Arts",
        Science => "Science",
        Commerce => "Commerce",
        Law => "Law",
    }
}

text_enum! {
    MarketDemand {
        VeryHigh => "Very High",
        High => "High",
        Moderate => "Moderate",
        Low => "Low",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerProspect {
    pub role: String,
    pub average_salary: f64,
    pub growth_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub category: CourseCategory,
    pub duration: String,
    pub description: String,
    pub eligibility: Vec<String>,
    pub career_prospects: Json<Vec<CareerProspect>>,
    pub skills: Vec<String>,
    pub subjects: Vec<String>,
    pub job_market_demand: MarketDemand,
    pub average_salary: f64,
    pub top_recruiters: Vec<String>,
    #[serde(rename = "entrance_exams")]
    pub entrance_exams: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub code: String,
    pub category: CourseCategory,
    pub duration: String,
    pub description: String,
    #[serde(default)]
    pub eligibility: Vec<String>,
    #[serde(default)]
    pub career_prospects: Vec<CareerProspect>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    pub job_market_demand: MarketDemand,
    pub average_salary: f64,
    #[serde(default)]
    pub top_recruiters: Vec<String>,
    #[serde(default, rename = "entrance_exams")]
    pub entrance_exams: Vec<String>,
}

impl NewCourse {
    pub fn normalized(mut self) -> Result<Self, AppError> {
        self.title = self.title.trim().to_string();
        self.code = self.code.trim().to_uppercase();

        let mut v = Violations::default();
        v.require(&self.title, "Course title is required");
        v.max_chars(&self.title, 200, "Course title cannot exceed 200 characters");
        v.require(&self.code, "Course code is required");
        v.require(&self.duration, "Duration is required");
        v.require(&self.description, "Description is required");
        v.max_chars(
            &self.description,
            1000,
            "Description cannot exceed 1000 characters",
        );
        v.check(
            self.career_prospects.iter().all(|p| !p.role.trim().is_empty()),
            "Career prospect role is required",
        );
        v.into_result()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_code_uppercased() {
        let course: NewCourse = serde_json::from_value(serde_json::json!({
            "title": " B.Tech Computer Science ",
            "code": "btech-cs",
            "category": "Engineering",
            "duration": "4 years",
            "description": "Undergraduate engineering programme",
            "jobMarketDemand": "Very High",
            "averageSalary": 800000.0,
            "entrance_exams": ["JEE Main"]
        }))
        .unwrap();

        let course = course.normalized().unwrap();
        assert_eq!(course.code, "BTECH-CS");
        assert_eq!(course.title, "B.Tech Computer Science");
        assert_eq!(course.job_market_demand, MarketDemand::VeryHigh);
        assert_eq!(course.entrance_exams, vec!["JEE Main".to_string()]);
    }

    #[test]
    fn test_unknown_category_rejected_at_deserialize() {
        let result: Result<NewCourse, _> = serde_json::from_value(serde_json::json!({
            "title": "Astrology",
            "code": "AST",
            "category": "Occult",
            "duration": "1 year",
            "description": "-",
            "jobMarketDemand": "Low",
            "averageSalary": 0.0
        }));
        assert!(result.is_err());
    }
}
