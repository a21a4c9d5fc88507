//! Persistence operations used by the route handlers.
//!
//! Handlers talk to the [`Store`] trait only. Production wires in
//! [`postgres::PgStore`]; tests use an in-memory implementation.

use async_trait::async_trait;
use chrono::Duration;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::aptitude::{
    AptitudeQuestion, AptitudeResult, Difficulty, NewAptitudeQuestion, NewAptitudeResult,
    QuestionCategory,
};
use crate::models::college::{College, CollegeType, NewCollege};
use crate::models::course::{Course, CourseCategory, NewCourse};
use crate::models::history::{RecommendationKind, RecommendationRecord};
use crate::models::profile::{ProfileDocument, Session};
use crate::models::user::{NewUser, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub category: Option<QuestionCategory>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone)]
pub struct CourseQuery {
    pub category: Option<CourseCategory>,
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone)]
pub struct CollegeQuery {
    pub state: Option<String>,
    pub city: Option<String>,
    pub college_type: Option<CollegeType>,
    pub course: Option<String>,
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

/// One page of results plus the unpaginated match count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Row offset for a 1-based page number.
pub fn page_offset(page: u32, limit: u32) -> i64 {
    i64::from(page.saturating_sub(1)) * i64::from(limit)
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Random sample of at most `limit` questions matching `filter`.
    async fn sample_questions(
        &self,
        filter: &QuestionFilter,
        limit: u32,
    ) -> Result<Vec<AptitudeQuestion>, AppError>;

    async fn insert_question(&self, question: NewAptitudeQuestion)
        -> Result<AptitudeQuestion, AppError>;

    async fn list_courses(&self, query: &CourseQuery) -> Result<Page<Course>, AppError>;

    async fn insert_course(&self, course: NewCourse) -> Result<Course, AppError>;

    async fn list_colleges(&self, query: &CollegeQuery) -> Result<Page<College>, AppError>;

    async fn insert_college(&self, college: NewCollege) -> Result<College, AppError>;

    async fn create_user(&self, user: NewUser, password_hash: String) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn create_session(&self, email: &str, ttl: Duration) -> Result<Session, AppError>;

    async fn find_session(&self, token: Uuid) -> Result<Option<Session>, AppError>;

    async fn insert_result(&self, result: NewAptitudeResult) -> Result<AptitudeResult, AppError>;

    /// Only returns the result when it belongs to `user_id`.
    async fn find_result(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<AptitudeResult>, AppError>;

    /// The user's most recently completed results, newest first.
    async fn recent_results(&self, user_id: Uuid, limit: u32)
        -> Result<Vec<AptitudeResult>, AppError>;

    /// Newest stored set of `kind` for the user.
    async fn latest_recommendations(
        &self,
        user_id: Uuid,
        kind: RecommendationKind,
    ) -> Result<Option<RecommendationRecord>, AppError>;

    /// Appends a set to the user's history, keeping only the newest
    /// `HISTORY_LIMIT` sets.
    async fn insert_recommendations(
        &self,
        user_id: Uuid,
        kind: RecommendationKind,
        recommendations: Vec<Value>,
    ) -> Result<RecommendationRecord, AppError>;

    async fn get_profile(&self, email: &str) -> Result<Option<ProfileDocument>, AppError>;

    async fn upsert_profile(&self, email: &str, profile: Value)
        -> Result<ProfileDocument, AppError>;

    /// Removes every saved profile for `email`, returning how many were deleted.
    async fn delete_profiles(&self, email: &str) -> Result<u64, AppError>;
}
