//! Canned chat replies, chosen by keyword when the chat backend is down.

use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

const GREETING: &str = "I'm here to help with your career guidance questions. ";

const GENERIC_HINT: &str = "Feel free to ask me about career paths, skill development, \
    college recommendations, or job market insights.";

/// A keyword rule: any of `keywords` found in the message selects `reply`.
pub struct ChatRule {
    pub topic: &'static str,
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

/// Checked in order; the first rule with a matching keyword wins.
pub const CHAT_RULES: &[ChatRule] = &[
    ChatRule {
        topic: "career",
        keywords: &["career"],
        reply: "Based on your profile, I'd recommend exploring careers in technology, \
            specifically software development or data science. These fields offer excellent \
            growth opportunities and align with current market trends.",
    },
    ChatRule {
        topic: "skill",
        keywords: &["skill"],
        reply: "To enhance your skills, I suggest focusing on programming languages like \
            Python or JavaScript, and developing problem-solving abilities through coding \
            practice and projects.",
    },
    ChatRule {
        topic: "education",
        keywords: &["college", "course"],
        reply: "For college selection, consider institutions with strong placement records \
            in your field of interest. Look for programs that offer practical exposure and \
            industry connections.",
    },
    ChatRule {
        topic: "job_market",
        keywords: &["salary", "job"],
        reply: "Current job market trends show high demand in tech sectors. Entry-level \
            positions typically offer ₹3-8 LPA, with significant growth potential based on \
            skills and experience.",
    },
];

const SUGGESTIONS: [&str; 4] = [
    "Tell me about trending career options",
    "How can I improve my technical skills?",
    "What colleges should I consider?",
    "What's the current job market like?",
];

/// Picks the canned reply for `message` (case-insensitive substring match).
pub fn select_reply(message: &str) -> String {
    let lowered = message.to_lowercase();
    match CHAT_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
    {
        Some(rule) => {
            debug!(topic = rule.topic, "Chat fallback matched keyword rule");
            rule.reply.to_string()
        }
        None => format!("{GREETING}{GENERIC_HINT}"),
    }
}

/// Full chat payload in the backend's response shape.
pub fn chat_reply(message: &str, user_id: Option<&str>) -> Value {
    json!({
        "response": select_reply(message),
        "timestamp": Utc::now().to_rfc3339(),
        "conversation_id": format!("conv_{}", Uuid::new_v4()),
        "user_id": user_id.unwrap_or("demo_user"),
        "context": {
            "intent": "career_guidance",
            "confidence": 0.8,
            "relevant_topics": ["career_planning", "skill_development"]
        },
        "suggestions": SUGGESTIONS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_for(topic: &str) -> &'static str {
        CHAT_RULES.iter().find(|r| r.topic == topic).unwrap().reply
    }

    #[test]
    fn test_salary_selects_job_market_reply_case_insensitive() {
        assert_eq!(select_reply("What SALARY can I expect?"), reply_for("job_market"));
        assert_eq!(select_reply("any good Jobs near me"), reply_for("job_market"));
    }

    #[test]
    fn test_earlier_rule_wins() {
        // "career" outranks "salary"
        assert_eq!(
            select_reply("career with the best salary"),
            reply_for("career")
        );
        // "skill" outranks "course"
        assert_eq!(select_reply("which course builds skills"), reply_for("skill"));
        // "college" outranks "job"
        assert_eq!(
            select_reply("does my college help with job placement"),
            reply_for("education")
        );
    }

    #[test]
    fn test_unmatched_message_gets_generic_reply() {
        let reply = select_reply("hello there");
        assert!(reply.starts_with(GREETING));
        assert!(reply.ends_with(GENERIC_HINT));
    }

    #[test]
    fn test_chat_reply_shape() {
        let body = chat_reply("salary", None);
        assert_eq!(body["user_id"], "demo_user");
        assert_eq!(body["context"]["intent"], "career_guidance");
        assert_eq!(body["context"]["relevant_topics"].as_array().unwrap().len(), 2);
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 4);
        assert!(body["conversation_id"].as_str().unwrap().starts_with("conv_"));
        assert!(body["timestamp"].is_string());

        let body = chat_reply("hi", Some("u-42"));
        assert_eq!(body["user_id"], "u-42");
    }
}
