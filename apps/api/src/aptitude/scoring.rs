//! Scoring for submitted assessments.
//!
//! Each test type has a fixed set of categories and a scale factor. A
//! response's numeric answer is added to the categories it counts toward,
//! then each category total is averaged over all responses and scaled into
//! 0..=100. No population data exists, so the percentile is the score
//! rounded down.

use crate::models::aptitude::{
    Answer, AptitudeResponse, AssessmentResults, CategoryScore, PersonalityInsight,
    ResultRecommendations, TestType,
};
use crate::models::Stream;

const MAX_SCORE: f64 = 100.0;
const STRENGTH_THRESHOLD: f64 = 70.0;
const CHALLENGE_THRESHOLD: f64 = 30.0;
const TOP_N: usize = 3;

struct Rubric {
    categories: &'static [&'static str],
    scale: f64,
    /// Personality answers only count toward the category named in the
    /// question id; every other type counts each answer everywhere.
    by_question_id: bool,
}

fn rubric(test_type: TestType) -> Rubric {
    match test_type {
        TestType::Personality => Rubric {
            categories: &[
                "extraversion",
                "agreeableness",
                "conscientiousness",
                "neuroticism",
                "openness",
            ],
            scale: 20.0,
            by_question_id: true,
        },
        TestType::Intelligence => Rubric {
            categories: &["logical", "numerical", "verbal", "spatial"],
            scale: 25.0,
            by_question_id: false,
        },
        TestType::Interest => Rubric {
            categories: &[
                "science",
                "technology",
                "engineering",
                "arts",
                "business",
                "social",
            ],
            scale: 20.0,
            by_question_id: false,
        },
        TestType::Skill => Rubric {
            categories: &[
                "technical",
                "communication",
                "leadership",
                "analytical",
                "creative",
            ],
            scale: 20.0,
            by_question_id: false,
        },
    }
}

/// Integer value of an answer: leading integer of a string, truncated
/// number, or 0 when neither parses.
pub fn answer_value(answer: &Answer) -> i64 {
    match answer {
        Answer::Number(n) if n.is_finite() => n.trunc() as i64,
        Answer::Number(_) => 0,
        Answer::Text(text) => leading_integer(text).unwrap_or(0),
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let digits_start = usize::from(text.starts_with(['-', '+']));
    let digits_len = text[digits_start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    text[..digits_start + digits_len].parse().ok()
}

/// Per-category scores sorted by score, highest first. Ties keep the
/// rubric's category order.
pub fn score_responses(test_type: TestType, responses: &[AptitudeResponse]) -> Vec<CategoryScore> {
    let rubric = rubric(test_type);
    let mut totals = vec![0.0f64; rubric.categories.len()];

    for response in responses {
        let value = answer_value(&response.answer) as f64;
        if rubric.by_question_id {
            let question_id = response.question_id.to_lowercase();
            if let Some(i) = rubric
                .categories
                .iter()
                .position(|c| question_id.contains(c))
            {
                totals[i] += value;
            }
        } else {
            totals.iter_mut().for_each(|t| *t += value);
        }
    }

    let count = responses.len().max(1) as f64;
    let mut scores: Vec<CategoryScore> = rubric
        .categories
        .iter()
        .zip(totals)
        .map(|(category, total)| {
            let score = (total / count * rubric.scale).clamp(0.0, MAX_SCORE);
            CategoryScore {
                category: category.to_string(),
                score,
                percentile: score.floor(),
            }
        })
        .collect();

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, new: impl IntoIterator<Item = T>) {
    for item in new {
        if !items.contains(&item) {
            items.push(item);
        }
    }
}

/// Streams and career paths suggested by the top scores. `scores` must be
/// sorted highest first.
pub fn recommend(test_type: TestType, scores: &[CategoryScore]) -> ResultRecommendations {
    let top = &scores[..scores.len().min(TOP_N)];
    let leader = top.first().map(|s| s.category.as_str());
    let in_top = |category: &str| top.iter().any(|s| s.category == category);

    let mut rec = ResultRecommendations::default();
    let mut add = |streams: &[Stream], careers: &[&str]| {
        push_unique(&mut rec.streams, streams.iter().copied());
        push_unique(
            &mut rec.career_paths,
            careers.iter().map(|c| c.to_string()),
        );
    };

    match test_type {
        TestType::Personality => {
            if leader == Some("extraversion") {
                add(
                    &[Stream::Management, Stream::Commerce],
                    &["Business Management", "Sales", "Marketing"],
                );
            }
            if in_top("openness") {
                add(
                    &[Stream::Arts, Stream::Science],
                    &["Research", "Creative Arts", "Innovation"],
                );
            }
        }
        TestType::Intelligence => {
            if leader == Some("logical") {
                add(
                    &[Stream::Engineering, Stream::Science],
                    &["Software Engineering", "Data Science", "Research"],
                );
            }
            if in_top("numerical") {
                add(
                    &[Stream::Engineering, Stream::Commerce],
                    &["Finance", "Accounting", "Engineering"],
                );
            }
        }
        TestType::Interest => {
            if leader == Some("technology") {
                add(
                    &[Stream::Engineering, Stream::Science],
                    &["Software Development", "IT Consulting", "Cybersecurity"],
                );
            }
            if in_top("arts") {
                add(
                    &[Stream::Arts, Stream::Vocational],
                    &["Graphic Design", "Literature", "Performing Arts"],
                );
            }
        }
        TestType::Skill => {
            if leader == Some("technical") {
                add(
                    &[Stream::Engineering, Stream::Vocational],
                    &["Technical Support", "Engineering", "IT Services"],
                );
            }
        }
    }

    rec
}

/// Personality profile from sorted scores.
pub fn personality_insight(scores: &[CategoryScore]) -> PersonalityInsight {
    let categories_where = |keep: fn(f64) -> bool| -> Vec<String> {
        scores
            .iter()
            .filter(|s| keep(s.score))
            .map(|s| s.category.clone())
            .collect()
    };

    PersonalityInsight {
        personality_type: scores
            .first()
            .map(|s| s.category.clone())
            .unwrap_or_else(|| "balanced".to_string()),
        traits: scores.iter().take(TOP_N).map(|s| s.category.clone()).collect(),
        strengths: categories_where(|score| score > STRENGTH_THRESHOLD),
        challenges: categories_where(|score| score < CHALLENGE_THRESHOLD),
    }
}

/// Full assessment for a submission.
pub fn assess(test_type: TestType, responses: &[AptitudeResponse]) -> AssessmentResults {
    let scores = score_responses(test_type, responses);
    let recommendations = recommend(test_type, &scores);
    let personality = (test_type == TestType::Personality).then(|| personality_insight(&scores));

    AssessmentResults {
        scores,
        recommendations,
        personality,
    }
}
