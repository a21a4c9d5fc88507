// Prompts for the AI career advisor.
// Composes the JSON-only fragment from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Role and response schema for the advisor. `JSON_ONLY_SYSTEM` is appended.
const ADVISOR_ROLE: &str = r#"You are an expert career counselor and educational advisor. Based on the user's profile, aptitude test scores, and preferences, provide personalized career and educational recommendations.

Your response should be a JSON object with the following structure:
{
  "courseRecommendations": [
    {
      "title": "Course Title",
      "category": "Engineering/Medical/Business/Arts",
      "match_percentage": 85,
      "reasons": ["reason1", "reason2"],
      "career_prospects": ["job1", "job2"],
      "salary_range": "INR X - Y LPA"
    }
  ],
  "collegeRecommendations": [
    {
      "name": "College Name",
      "type": "Government/Private",
      "location": "City, State",
      "match_percentage": 90,
      "reasons": ["reason1", "reason2"],
      "specializations": ["spec1", "spec2"]
    }
  ],
  "careerPath": {
    "immediate_steps": ["step1", "step2"],
    "short_term_goals": ["goal1", "goal2"],
    "long_term_vision": "career vision",
    "skills_to_develop": ["skill1", "skill2"]
  },
  "personalizedAdvice": "Detailed advice based on user profile"
}

Consider factors like:
- Aptitude test performance in different areas
- User's interests and preferences
- Market demand and salary prospects
- Geographic preferences
- Family background and constraints
- Long-term career goals"#;

pub fn advisor_system() -> String {
    format!("{ADVISOR_ROLE}\n\n{JSON_ONLY_SYSTEM}")
}

/// User prompt template.
/// Replace: {user_profile}, {aptitude_scores}, {preferences}, {context}
pub const ADVISOR_PROMPT_TEMPLATE: &str = r#"Please analyze my profile and provide career recommendations:

User Profile: {user_profile}
Aptitude Scores: {aptitude_scores}
Preferences: {preferences}

Available Options: {context}"#;

/// Long-term vision used when the model's reply is not JSON.
pub const FALLBACK_VISION: &str = "Personalized career guidance based on your profile";
