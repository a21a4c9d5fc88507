use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use uuid::Uuid;

/// One recommendation as the backend sends it. Every field is optional and a
/// field of the wrong type reads as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecommendation {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub provider: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub difficulty_level: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub match_percentage: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub reasoning: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub skills_gained: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub prerequisites: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub estimated_cost: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub enrollments: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecommendation {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_percentage: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub skills: Vec<String>,
    pub prerequisites: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollments: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ClientRecommendation {
    fn from_raw(raw: RawRecommendation, id: String) -> Self {
        Self {
            id,
            title: raw.title,
            provider: raw.provider,
            description: raw.description,
            duration: raw.duration,
            level: raw.difficulty_level,
            match_percentage: raw.match_percentage,
            reasoning: raw.reasoning,
            skills: raw.skills_gained.unwrap_or_default(),
            prerequisites: raw.prerequisites.unwrap_or_default(),
            estimated_cost: raw.estimated_cost,
            rating: raw.rating,
            enrollments: raw.enrollments,
            url: raw.url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsEnvelope {
    pub success: bool,
    pub recommendations: Vec<ClientRecommendation>,
    pub total_found: u64,
    pub processing_time: Number,
    pub generated_at: String,
}

/// Id source used outside tests.
pub fn recommendation_id() -> String {
    format!("rec_{}", Uuid::new_v4())
}

/// Converts a backend response into the client envelope. One output per
/// element of `recommendations`, in order; a missing list yields none.
pub fn transform(upstream: &Value, mut next_id: impl FnMut() -> String) -> RecommendationsEnvelope {
    let recommendations: Vec<ClientRecommendation> = upstream
        .get("recommendations")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let raw = RawRecommendation::deserialize(item).unwrap_or_default();
                    ClientRecommendation::from_raw(raw, next_id())
                })
                .collect()
        })
        .unwrap_or_default();

    RecommendationsEnvelope {
        success: upstream
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        total_found: upstream
            .get("total_found")
            .and_then(Value::as_u64)
            .unwrap_or(recommendations.len() as u64),
        processing_time: match upstream.get("processing_time") {
            Some(Value::Number(n)) => n.clone(),
            _ => Number::from(0),
        },
        generated_at: upstream
            .get("generated_at")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
        recommendations,
    }
}
