use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_USER_ID: &str = "anonymous_user";
pub const DEFAULT_MAX_RECOMMENDATIONS: u64 = 10;

/// Profile in the shape the recommendation backend expects. Always total:
/// absent text fields are `None`, absent lists are empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub user_id: String,
    pub email: Option<String>,
    pub academic_level: Option<String>,
    pub interests: Vec<String>,
    pub career_goals: Vec<String>,
    pub current_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub learning_style: Option<String>,
    pub time_commitment: Option<String>,
    pub budget_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRequest {
    pub user_profile: UserProfile,
    pub max_recommendations: u64,
    pub focus_areas: Vec<String>,
}

/// Keys tried in order for each profile field.
const EMAIL: &[&str] = &["email"];
const ACADEMIC_LEVEL: &[&str] = &["academicLevel", "education_level", "academic_level"];
const INTERESTS: &[&str] = &["interests"];
const CAREER_GOALS: &[&str] = &["careerGoals", "career_goals"];
const CURRENT_SKILLS: &[&str] = &["currentSkills", "current_skills"];
const SKILL_GAPS: &[&str] = &["skillGaps", "skill_gaps"];
const LEARNING_STYLE: &[&str] = &["learningStyle", "learning_style"];
const TIME_COMMITMENT: &[&str] = &["timeCommitment", "time_commitment"];
const BUDGET_RANGE: &[&str] = &["budgetRange", "budget_range"];

const USER_ID: &[&str] = &["userId", "user_id"];
const PREFERENCES: &[&str] = &["userPreferences", "user_preferences"];
const MAX_RECOMMENDATIONS: &[&str] = &["maxRecommendations", "max_recommendations"];
const FOCUS_AREAS: &[&str] = &["focusAreas", "focus_areas"];

/// Maps an arbitrary client body onto the backend request. Never fails:
/// anything missing, empty or of the wrong type falls back to its default.
pub fn normalize(body: &Value) -> NormalizedRequest {
    let empty = Map::new();
    let root = body.as_object().unwrap_or(&empty);
    let prefs = PREFERENCES
        .iter()
        .find_map(|key| root.get(*key).and_then(Value::as_object))
        .unwrap_or(&empty);

    let user_profile = UserProfile {
        user_id: text(root, USER_ID).unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
        email: text(prefs, EMAIL),
        academic_level: text(prefs, ACADEMIC_LEVEL),
        interests: list(prefs, INTERESTS),
        career_goals: list(prefs, CAREER_GOALS),
        current_skills: list(prefs, CURRENT_SKILLS),
        skill_gaps: list(prefs, SKILL_GAPS),
        learning_style: text(prefs, LEARNING_STYLE),
        time_commitment: text(prefs, TIME_COMMITMENT),
        budget_range: text(prefs, BUDGET_RANGE),
    };

    NormalizedRequest {
        user_profile,
        max_recommendations: MAX_RECOMMENDATIONS
            .iter()
            .find_map(|key| root.get(*key).and_then(non_negative_integer))
            .unwrap_or(DEFAULT_MAX_RECOMMENDATIONS),
        focus_areas: list(root, FOCUS_AREAS),
    }
}

/// First non-empty string under any of `keys`.
fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First list under any of `keys` that still has elements after dropping
/// non-string entries.
fn list(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .find(|items| !items.is_empty())
        .unwrap_or_default()
}

fn non_negative_integer(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    // 5.0 is still an integer
    let f = value.as_f64()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}
