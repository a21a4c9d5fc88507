//! Axum route handler for the AI career advisor.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::advisor::prompts::{advisor_system, ADVISOR_PROMPT_TEMPLATE, FALLBACK_VISION};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::college::{College, CollegeLocation, CollegeType, Ranking};
use crate::models::course::{Course, CourseCategory, MarketDemand};
use crate::state::AppState;
use crate::store::{CollegeQuery, CourseQuery};

/// Catalog rows offered to the model as context.
const CATALOG_LIMIT: u32 = 20;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvisorRequest {
    pub user_profile: Value,
    pub aptitude_scores: Value,
    pub preferences: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CourseSummary<'a> {
    title: &'a str,
    category: CourseCategory,
    skills: &'a [String],
    average_salary: f64,
    job_market_demand: MarketDemand,
}

impl<'a> From<&'a Course> for CourseSummary<'a> {
    fn from(course: &'a Course) -> Self {
        Self {
            title: &course.title,
            category: course.category,
            skills: &course.skills,
            average_salary: course.average_salary,
            job_market_demand: course.job_market_demand,
        }
    }
}

#[derive(Debug, Serialize)]
struct CollegeSummary<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    college_type: CollegeType,
    location: &'a CollegeLocation,
    ranking: &'a Ranking,
}

impl<'a> From<&'a College> for CollegeSummary<'a> {
    fn from(college: &'a College) -> Self {
        Self {
            name: &college.name,
            college_type: college.college_type,
            location: &college.location,
            ranking: &college.ranking,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdvisorResponse {
    pub success: bool,
    pub data: Value,
    pub timestamp: String,
}

/// Builds the user prompt from the request and the catalog sample.
pub fn build_prompt(
    request: &AdvisorRequest,
    courses: &[Course],
    colleges: &[College],
) -> Result<String, AppError> {
    let context = json!({
        "userProfile": request.user_profile,
        "aptitudeScores": request.aptitude_scores,
        "preferences": request.preferences,
        "availableCourses": courses.iter().map(CourseSummary::from).collect::<Vec<_>>(),
        "availableColleges": colleges.iter().map(CollegeSummary::from).collect::<Vec<_>>(),
    });

    let to_json = |v: &Value| serde_json::to_string(v).map_err(|e| AppError::Internal(e.into()));

    Ok(ADVISOR_PROMPT_TEMPLATE
        .replace("{user_profile}", &to_json(&request.user_profile)?)
        .replace("{aptitude_scores}", &to_json(&request.aptitude_scores)?)
        .replace("{preferences}", &to_json(&request.preferences)?)
        .replace(
            "{context}",
            &serde_json::to_string_pretty(&context).map_err(|e| AppError::Internal(e.into()))?,
        ))
}

/// Parses the model's reply, or wraps free text as advice.
pub fn parse_advice(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => value,
        _ => {
            warn!("Advisor reply is not a JSON object, wrapping as free-form advice");
            json!({
                "courseRecommendations": [],
                "collegeRecommendations": [],
                "careerPath": {
                    "immediate_steps": [],
                    "short_term_goals": [],
                    "long_term_vision": FALLBACK_VISION,
                    "skills_to_develop": []
                },
                "personalizedAdvice": text,
            })
        }
    }
}

async fn generate_advice(llm: &LlmClient, prompt: &str) -> Result<Value, AppError> {
    let text = llm
        .call_text(prompt, &advisor_system())
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    Ok(parse_advice(&text))
}

/// POST /api/ai/recommendations
///
/// Sends the profile and a sample of the course and college catalog to the
/// LLM and returns its recommendations.
pub async fn handle_ai_recommendations(
    State(state): State<AppState>,
    Json(request): Json<AdvisorRequest>,
) -> Result<Json<AdvisorResponse>, AppError> {
    let courses = state
        .store
        .list_courses(&CourseQuery {
            category: None,
            search: None,
            page: 1,
            limit: CATALOG_LIMIT,
        })
        .await?;
    let colleges = state
        .store
        .list_colleges(&CollegeQuery {
            state: None,
            city: None,
            college_type: None,
            course: None,
            search: None,
            page: 1,
            limit: CATALOG_LIMIT,
        })
        .await?;

    info!(
        courses = courses.items.len(),
        colleges = colleges.items.len(),
        "Generating AI recommendations"
    );

    let prompt = build_prompt(&request, &courses.items, &colleges.items)?;
    let data = generate_advice(&state.llm, &prompt).await?;

    Ok(Json(AdvisorResponse {
        success: true,
        data,
        timestamp: Utc::now().to_rfc3339(),
    }))
}
