use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::DbGateway;
use crate::errors::{map_unique_violation, AppError};
use crate::models::aptitude::{
    AptitudeQuestion, AptitudeResult, NewAptitudeQuestion, NewAptitudeResult,
};
use crate::models::college::{College, NewCollege};
use crate::models::course::{Course, NewCourse};
use crate::models::history::{RecommendationKind, RecommendationRecord, HISTORY_LIMIT};
use crate::models::profile::{ProfileDocument, Session};
use crate::models::user::{NewUser, User};
use crate::store::{page_offset, CollegeQuery, CourseQuery, Page, QuestionFilter, Store};

/// [`Store`] backed by PostgreSQL. Every operation goes through the shared
/// [`DbGateway`], so the pool is established once and reused.
pub struct PgStore {
    gateway: Arc<DbGateway>,
}

impl PgStore {
    pub fn new(gateway: Arc<DbGateway>) -> Self {
        Self { gateway }
    }

    async fn pool(&self) -> Result<&PgPool, AppError> {
        Ok(self.gateway.connect().await?)
    }
}

/// `%term%` for ILIKE, with LIKE metacharacters escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl Store for PgStore {
    async fn sample_questions(
        &self,
        filter: &QuestionFilter,
        limit: u32,
    ) -> Result<Vec<AptitudeQuestion>, AppError> {
        let pool = self.pool().await?;
        Ok(sqlx::query_as::<_, AptitudeQuestion>(
            r#"
            SELECT * FROM aptitude_questions
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR difficulty = $2)
            ORDER BY random()
            LIMIT $3
            "#,
        )
        .bind(filter.category)
        .bind(filter.difficulty)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await?)
    }

    async fn insert_question(
        &self,
        question: NewAptitudeQuestion,
    ) -> Result<AptitudeQuestion, AppError> {
        let pool = self.pool().await?;
        let inserted = sqlx::query_as::<_, AptitudeQuestion>(
            r#"
            INSERT INTO aptitude_questions
                (id, category, subcategory, question, options, correct_answer,
                 explanation, difficulty, time_limit)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(question.category)
        .bind(&question.subcategory)
        .bind(&question.question)
        .bind(&question.options)
        .bind(question.correct_answer)
        .bind(&question.explanation)
        .bind(question.difficulty)
        .bind(question.time_limit)
        .fetch_one(pool)
        .await?;

        info!("Inserted aptitude question {}", inserted.id);
        Ok(inserted)
    }

    async fn list_courses(&self, query: &CourseQuery) -> Result<Page<Course>, AppError> {
        let pool = self.pool().await?;
        let pattern = query.search.as_deref().map(like_pattern);
        let filter = r#"
            ($1::text IS NULL OR category = $1)
            AND ($2::text IS NULL
                 OR title ILIKE $2
                 OR description ILIKE $2
                 OR EXISTS (SELECT 1 FROM unnest(skills) AS skill WHERE skill ILIKE $2))
        "#;

        let items = sqlx::query_as::<_, Course>(&format!(
            "SELECT * FROM courses WHERE {filter} \
             ORDER BY average_salary DESC, title ASC LIMIT $3 OFFSET $4"
        ))
        .bind(query.category)
        .bind(&pattern)
        .bind(i64::from(query.limit))
        .bind(page_offset(query.page, query.limit))
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM courses WHERE {filter}"))
            .bind(query.category)
            .bind(&pattern)
            .fetch_one(pool)
            .await?;

        Ok(Page { items, total })
    }

    async fn insert_course(&self, course: NewCourse) -> Result<Course, AppError> {
        let pool = self.pool().await?;
        let inserted = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses
                (id, title, code, category, duration, description, eligibility,
                 career_prospects, skills, subjects, job_market_demand, average_salary,
                 top_recruiters, entrance_exams)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&course.title)
        .bind(&course.code)
        .bind(course.category)
        .bind(&course.duration)
        .bind(&course.description)
        .bind(&course.eligibility)
        .bind(Json(&course.career_prospects))
        .bind(&course.skills)
        .bind(&course.subjects)
        .bind(course.job_market_demand)
        .bind(course.average_salary)
        .bind(&course.top_recruiters)
        .bind(&course.entrance_exams)
        .fetch_one(pool)
        .await
        .map_err(|e| map_unique_violation(e, "Course code already exists"))?;

        info!("Inserted course {} ({})", inserted.code, inserted.id);
        Ok(inserted)
    }

    async fn list_colleges(&self, query: &CollegeQuery) -> Result<Page<College>, AppError> {
        let pool = self.pool().await?;
        let pattern = query.search.as_deref().map(like_pattern);
        let filter = r#"
            ($1::text IS NULL OR location ->> 'state' ILIKE $1)
            AND ($2::text IS NULL OR location ->> 'city' ILIKE $2)
            AND ($3::text IS NULL OR college_type = $3)
            AND ($4::text IS NULL OR $4 = ANY(courses))
            AND ($5::text IS NULL
                 OR name ILIKE $5
                 OR location ->> 'city' ILIKE $5
                 OR EXISTS (SELECT 1 FROM unnest(courses) AS course WHERE course ILIKE $5))
        "#;

        let items = sqlx::query_as::<_, College>(&format!(
            "SELECT * FROM colleges WHERE {filter} \
             ORDER BY (ranking ->> 'nirf')::int ASC NULLS LAST, name ASC LIMIT $6 OFFSET $7"
        ))
        .bind(&query.state)
        .bind(&query.city)
        .bind(query.college_type)
        .bind(&query.course)
        .bind(&pattern)
        .bind(i64::from(query.limit))
        .bind(page_offset(query.page, query.limit))
        .fetch_all(pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM colleges WHERE {filter}"))
                .bind(&query.state)
                .bind(&query.city)
                .bind(query.college_type)
                .bind(&query.course)
                .bind(&pattern)
                .fetch_one(pool)
                .await?;

        Ok(Page { items, total })
    }

    async fn insert_college(&self, college: NewCollege) -> Result<College, AppError> {
        let pool = self.pool().await?;
        let inserted = sqlx::query_as::<_, College>(
            r#"
            INSERT INTO colleges
                (id, name, code, college_type, location, established_year, affiliation,
                 courses, facilities, ranking, admission_process, contact, placements)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&college.name)
        .bind(&college.code)
        .bind(college.college_type)
        .bind(Json(&college.location))
        .bind(college.established_year)
        .bind(&college.affiliation)
        .bind(&college.courses)
        .bind(&college.facilities)
        .bind(Json(&college.ranking))
        .bind(Json(&college.admission_process))
        .bind(Json(&college.contact))
        .bind(Json(&college.placements))
        .fetch_one(pool)
        .await
        .map_err(|e| map_unique_violation(e, "College code already exists"))?;

        info!("Inserted college {} ({})", inserted.code, inserted.id);
        Ok(inserted)
    }

    async fn create_user(&self, user: NewUser, password_hash: String) -> Result<User, AppError> {
        let pool = self.pool().await?;
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
                (id, name, email, password_hash, date_of_birth, gender, education_level,
                 interests, location, preferred_streams)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&password_hash)
        .bind(user.date_of_birth)
        .bind(user.gender)
        .bind(user.education_level)
        .bind(&user.interests)
        .bind(Json(&user.location))
        .bind(Json(&user.preferred_streams))
        .fetch_one(pool)
        .await
        .map_err(|e| map_unique_violation(e, "An account with this email already exists"))?;

        info!("Registered user {}", created.id);
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let pool = self.pool().await?;
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(email.trim().to_lowercase())
                .fetch_optional(pool)
                .await?,
        )
    }

    async fn create_session(&self, email: &str, ttl: Duration) -> Result<Session, AppError> {
        let pool = self.pool().await?;
        Ok(sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (token, email, expires_at) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(Utc::now() + ttl)
        .fetch_one(pool)
        .await?)
    }

    async fn find_session(&self, token: Uuid) -> Result<Option<Session>, AppError> {
        let pool = self.pool().await?;
        Ok(
            sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token = $1")
                .bind(token)
                .fetch_optional(pool)
                .await?,
        )
    }

    async fn insert_result(&self, result: NewAptitudeResult) -> Result<AptitudeResult, AppError> {
        let pool = self.pool().await?;
        let inserted = sqlx::query_as::<_, AptitudeResult>(
            r#"
            INSERT INTO aptitude_results
                (id, user_id, test_type, responses, results, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(result.user_id)
        .bind(result.test_type)
        .bind(Json(&result.responses))
        .bind(Json(&result.results))
        .bind(result.completed_at)
        .fetch_one(pool)
        .await?;

        info!(
            "Stored {} result {} for user {}",
            inserted.test_type.as_str(),
            inserted.id,
            inserted.user_id
        );
        Ok(inserted)
    }

    async fn find_result(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<AptitudeResult>, AppError> {
        let pool = self.pool().await?;
        Ok(sqlx::query_as::<_, AptitudeResult>(
            "SELECT * FROM aptitude_results WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?)
    }

    async fn recent_results(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> Result<Vec<AptitudeResult>, AppError> {
        let pool = self.pool().await?;
        Ok(sqlx::query_as::<_, AptitudeResult>(
            "SELECT * FROM aptitude_results WHERE user_id = $1 ORDER BY completed_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await?)
    }

    async fn latest_recommendations(
        &self,
        user_id: Uuid,
        kind: RecommendationKind,
    ) -> Result<Option<RecommendationRecord>, AppError> {
        let pool = self.pool().await?;
        Ok(sqlx::query_as::<_, RecommendationRecord>(
            r#"
            SELECT * FROM recommendation_history
            WHERE user_id = $1 AND kind = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .fetch_optional(pool)
        .await?)
    }

    async fn insert_recommendations(
        &self,
        user_id: Uuid,
        kind: RecommendationKind,
        recommendations: Vec<Value>,
    ) -> Result<RecommendationRecord, AppError> {
        let pool = self.pool().await?;
        let mut tx = pool.begin().await?;

        let inserted = sqlx::query_as::<_, RecommendationRecord>(
            r#"
            INSERT INTO recommendation_history (id, user_id, kind, recommendations)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(kind)
        .bind(Json(&recommendations))
        .fetch_one(&mut *tx)
        .await?;

        let pruned = sqlx::query(
            r#"
            DELETE FROM recommendation_history
            WHERE user_id = $1
              AND id NOT IN (
                  SELECT id FROM recommendation_history
                  WHERE user_id = $1
                  ORDER BY created_at DESC
                  LIMIT $2
              )
            "#,
        )
        .bind(user_id)
        .bind(HISTORY_LIMIT)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            "Stored {} {} recommendation(s) for user {} (pruned {})",
            inserted.recommendations.len(),
            kind.as_str(),
            user_id,
            pruned.rows_affected()
        );
        Ok(inserted)
    }

    async fn get_profile(&self, email: &str) -> Result<Option<ProfileDocument>, AppError> {
        let pool = self.pool().await?;
        Ok(
            sqlx::query_as::<_, ProfileDocument>("SELECT * FROM user_profiles WHERE email = $1")
                .bind(email)
                .fetch_optional(pool)
                .await?,
        )
    }

    async fn upsert_profile(
        &self,
        email: &str,
        profile: Value,
    ) -> Result<ProfileDocument, AppError> {
        let pool = self.pool().await?;
        Ok(sqlx::query_as::<_, ProfileDocument>(
            r#"
            INSERT INTO user_profiles (id, email, profile)
            VALUES ($1, $2, $3)
            ON CONFLICT (email)
            DO UPDATE SET profile = EXCLUDED.profile, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(&profile)
        .fetch_one(pool)
        .await?)
    }

    async fn delete_profiles(&self, email: &str) -> Result<u64, AppError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM user_profiles WHERE email = $1")
            .bind(email)
            .execute(pool)
            .await?;

        info!(
            "Deleted {} profile document(s) for {email}",
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }
}
