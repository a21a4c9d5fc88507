//! In-process [`Store`] used by handler tests. Sampling returns matches in
//! insertion order.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use sqlx::types::Json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::aptitude::{
    AptitudeQuestion, AptitudeResult, NewAptitudeQuestion, NewAptitudeResult,
};
use crate::models::college::{College, NewCollege};
use crate::models::course::{Course, NewCourse};
use crate::models::history::{RecommendationKind, RecommendationRecord, HISTORY_LIMIT};
use crate::models::profile::{ProfileDocument, Session};
use crate::models::user::{NewUser, User};
use crate::store::{page_offset, CollegeQuery, CourseQuery, Page, QuestionFilter, Store};

#[derive(Default)]
struct Tables {
    questions: Vec<AptitudeQuestion>,
    courses: Vec<Course>,
    colleges: Vec<College>,
    users: Vec<User>,
    sessions: Vec<Session>,
    results: Vec<AptitudeResult>,
    profiles: Vec<ProfileDocument>,
    history: Vec<RecommendationRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Backdates a stored set, for exercising the freshness window.
    pub fn age_recommendations(&self, user_id: Uuid, by: Duration) {
        for record in self.tables().history.iter_mut().filter(|r| r.user_id == user_id) {
            record.created_at -= by;
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn paginate<T: Clone>(matches: Vec<T>, page: u32, limit: u32) -> Page<T> {
    let total = matches.len() as i64;
    let items = matches
        .into_iter()
        .skip(page_offset(page, limit) as usize)
        .take(limit as usize)
        .collect();
    Page { items, total }
}

#[async_trait]
impl Store for MemoryStore {
    async fn sample_questions(
        &self,
        filter: &QuestionFilter,
        limit: u32,
    ) -> Result<Vec<AptitudeQuestion>, AppError> {
        Ok(self
            .tables()
            .questions
            .iter()
            .filter(|q| filter.category.map_or(true, |c| q.category == c))
            .filter(|q| filter.difficulty.map_or(true, |d| q.difficulty == d))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn insert_question(
        &self,
        question: NewAptitudeQuestion,
    ) -> Result<AptitudeQuestion, AppError> {
        let now = Utc::now();
        let stored = AptitudeQuestion {
            id: Uuid::new_v4(),
            category: question.category,
            subcategory: question.subcategory,
            question: question.question,
            options: question.options,
            correct_answer: question.correct_answer,
            explanation: question.explanation,
            difficulty: question.difficulty,
            time_limit: question.time_limit,
            created_at: now,
            updated_at: now,
        };
        self.tables().questions.push(stored.clone());
        Ok(stored)
    }

    async fn list_courses(&self, query: &CourseQuery) -> Result<Page<Course>, AppError> {
        let mut matches: Vec<Course> = self
            .tables()
            .courses
            .iter()
            .filter(|c| query.category.map_or(true, |cat| c.category == cat))
            .filter(|c| {
                query.search.as_deref().map_or(true, |s| {
                    contains_ci(&c.title, s)
                        || contains_ci(&c.description, s)
                        || c.skills.iter().any(|skill| contains_ci(skill, s))
                })
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.average_salary
                .total_cmp(&a.average_salary)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(paginate(matches, query.page, query.limit))
    }

    async fn insert_course(&self, course: NewCourse) -> Result<Course, AppError> {
        let mut tables = self.tables();
        if tables.courses.iter().any(|c| c.code == course.code) {
            return Err(AppError::Duplicate("Course code already exists".to_string()));
        }
        let now = Utc::now();
        let stored = Course {
            id: Uuid::new_v4(),
            title: course.title,
            code: course.code,
            category: course.category,
            duration: course.duration,
            description: course.description,
            eligibility: course.eligibility,
            career_prospects: Json(course.career_prospects),
            skills: course.skills,
            subjects: course.subjects,
            job_market_demand: course.job_market_demand,
            average_salary: course.average_salary,
            top_recruiters: course.top_recruiters,
            entrance_exams: course.entrance_exams,
            created_at: now,
            updated_at: now,
        };
        tables.courses.push(stored.clone());
        Ok(stored)
    }

    async fn list_colleges(&self, query: &CollegeQuery) -> Result<Page<College>, AppError> {
        let mut matches: Vec<College> = self
            .tables()
            .colleges
            .iter()
            .filter(|c| {
                query
                    .state
                    .as_deref()
                    .map_or(true, |s| c.location.state.eq_ignore_ascii_case(s))
            })
            .filter(|c| {
                query
                    .city
                    .as_deref()
                    .map_or(true, |s| c.location.city.eq_ignore_ascii_case(s))
            })
            .filter(|c| query.college_type.map_or(true, |t| c.college_type == t))
            .filter(|c| {
                query
                    .course
                    .as_deref()
                    .map_or(true, |course| c.courses.iter().any(|x| x == course))
            })
            .filter(|c| {
                query.search.as_deref().map_or(true, |s| {
                    contains_ci(&c.name, s)
                        || contains_ci(&c.location.city, s)
                        || c.courses.iter().any(|x| contains_ci(x, s))
                })
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| match (a.ranking.nirf, b.ranking.nirf) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(&b.name)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        });
        Ok(paginate(matches, query.page, query.limit))
    }

    async fn insert_college(&self, college: NewCollege) -> Result<College, AppError> {
        let mut tables = self.tables();
        if tables.colleges.iter().any(|c| c.code == college.code) {
            return Err(AppError::Duplicate("College code already exists".to_string()));
        }
        let now = Utc::now();
        let stored = College {
            id: Uuid::new_v4(),
            name: college.name,
            code: college.code,
            college_type: college.college_type,
            location: Json(college.location),
            established_year: college.established_year,
            affiliation: college.affiliation,
            courses: college.courses,
            facilities: college.facilities,
            ranking: Json(college.ranking),
            admission_process: Json(college.admission_process),
            contact: Json(college.contact),
            placements: Json(college.placements),
            created_at: now,
            updated_at: now,
        };
        tables.colleges.push(stored.clone());
        Ok(stored)
    }

    async fn create_user(&self, user: NewUser, password_hash: String) -> Result<User, AppError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Duplicate(
                "An account with this email already exists".to_string(),
            ));
        }
        let now = Utc::now();
        let stored = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash,
            date_of_birth: user.date_of_birth,
            gender: user.gender,
            education_level: user.education_level,
            interests: user.interests,
            location: Json(user.location),
            preferred_streams: Json(user.preferred_streams),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(stored.clone());
        Ok(stored)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.trim().to_lowercase();
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_session(&self, email: &str, ttl: Duration) -> Result<Session, AppError> {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4(),
            email: email.to_string(),
            expires_at: now + ttl,
            created_at: now,
        };
        self.tables().sessions.push(session.clone());
        Ok(session)
    }

    async fn find_session(&self, token: Uuid) -> Result<Option<Session>, AppError> {
        Ok(self
            .tables()
            .sessions
            .iter()
            .find(|s| s.token == token)
            .cloned())
    }

    async fn insert_result(&self, result: NewAptitudeResult) -> Result<AptitudeResult, AppError> {
        let stored = AptitudeResult {
            id: Uuid::new_v4(),
            user_id: result.user_id,
            test_type: result.test_type,
            responses: Json(result.responses),
            results: Json(result.results),
            completed_at: result.completed_at,
            created_at: Utc::now(),
        };
        self.tables().results.push(stored.clone());
        Ok(stored)
    }

    async fn find_result(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<AptitudeResult>, AppError> {
        Ok(self
            .tables()
            .results
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned())
    }

    async fn recent_results(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> Result<Vec<AptitudeResult>, AppError> {
        let mut results: Vec<AptitudeResult> = self
            .tables()
            .results
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        results.truncate(limit as usize);
        Ok(results)
    }

    async fn latest_recommendations(
        &self,
        user_id: Uuid,
        kind: RecommendationKind,
    ) -> Result<Option<RecommendationRecord>, AppError> {
        Ok(self
            .tables()
            .history
            .iter()
            .filter(|r| r.user_id == user_id && r.kind == kind)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn insert_recommendations(
        &self,
        user_id: Uuid,
        kind: RecommendationKind,
        recommendations: Vec<Value>,
    ) -> Result<RecommendationRecord, AppError> {
        let record = RecommendationRecord {
            id: Uuid::new_v4(),
            user_id,
            kind,
            recommendations: Json(recommendations),
            created_at: Utc::now(),
        };
        let mut tables = self.tables();
        tables.history.push(record.clone());

        let owned = tables.history.iter().filter(|r| r.user_id == user_id).count();
        let mut excess = owned.saturating_sub(HISTORY_LIMIT as usize);
        // Records are appended in time order, so the first ones are the oldest.
        tables.history.retain(|r| {
            if excess > 0 && r.user_id == user_id {
                excess -= 1;
                false
            } else {
                true
            }
        });
        Ok(record)
    }

    async fn get_profile(&self, email: &str) -> Result<Option<ProfileDocument>, AppError> {
        Ok(self
            .tables()
            .profiles
            .iter()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn upsert_profile(
        &self,
        email: &str,
        profile: Value,
    ) -> Result<ProfileDocument, AppError> {
        let mut tables = self.tables();
        let now = Utc::now();
        if let Some(existing) = tables.profiles.iter_mut().find(|p| p.email == email) {
            existing.profile = profile;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let doc = ProfileDocument {
            id: Uuid::new_v4(),
            email: email.to_string(),
            profile,
            created_at: now,
            updated_at: now,
        };
        tables.profiles.push(doc.clone());
        Ok(doc)
    }

    async fn delete_profiles(&self, email: &str) -> Result<u64, AppError> {
        let mut tables = self.tables();
        let before = tables.profiles.len();
        tables.profiles.retain(|p| p.email != email);
        Ok((before - tables.profiles.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_history_keeps_newest_sets_per_user() {
        let store = MemoryStore::new();
        let (user, other) = (Uuid::new_v4(), Uuid::new_v4());

        store
            .insert_recommendations(other, RecommendationKind::Course, vec![json!({ "n": -1 })])
            .await
            .unwrap();
        for n in 0..HISTORY_LIMIT + 2 {
            store
                .insert_recommendations(user, RecommendationKind::Course, vec![json!({ "n": n })])
                .await
                .unwrap();
        }

        let tables = store.tables();
        let mine: Vec<_> = tables.history.iter().filter(|r| r.user_id == user).collect();
        assert_eq!(mine.len(), HISTORY_LIMIT as usize);
        assert_eq!(mine[0].recommendations[0]["n"], 2);
        assert_eq!(tables.history.iter().filter(|r| r.user_id == other).count(), 1);
    }
}
