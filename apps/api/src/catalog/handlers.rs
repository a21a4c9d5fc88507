//! Axum route handlers for the course and college catalog.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::college::{College, NewCollege};
use crate::models::course::{Course, CourseCategory, NewCourse};
use crate::routes::params::{
    bounded_param, enum_param, text_param, Pagination, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT,
};
use crate::state::AppState;
use crate::store::{CollegeQuery, CourseQuery};

/// Category value that means "no category filter".
const ALL_CATEGORIES: &str = "all";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CollegeListQuery {
    pub state: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "type")]
    pub college_type: Option<String>,
    pub course: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub courses: Vec<Course>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct CollegeListResponse {
    pub colleges: Vec<College>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct CourseCreatedResponse {
    pub message: String,
    pub course: Course,
}

#[derive(Debug, Serialize)]
pub struct CollegeCreatedResponse {
    pub message: String,
    pub college: College,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/courses?category&search&page&limit
///
/// Highest average salary first, then title.
pub async fn handle_list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> Result<Json<CourseListResponse>, AppError> {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.eq_ignore_ascii_case(ALL_CATEGORIES));

    let course_query = CourseQuery {
        category: enum_param::<CourseCategory>(category, "category")?,
        search: text_param(query.search),
        page: bounded_param(query.page.as_deref(), DEFAULT_PAGE, u32::MAX),
        limit: bounded_param(query.limit.as_deref(), DEFAULT_LIMIT, MAX_LIMIT),
    };

    let page = state.store.list_courses(&course_query).await?;

    Ok(Json(CourseListResponse {
        courses: page.items,
        pagination: Pagination::new(course_query.page, course_query.limit, page.total),
    }))
}

/// POST /api/courses
pub async fn handle_create_course(
    State(state): State<AppState>,
    Json(request): Json<NewCourse>,
) -> Result<(StatusCode, Json<CourseCreatedResponse>), AppError> {
    let course = state.store.insert_course(request.normalized()?).await?;
    info!("Created course {} ({})", course.code, course.id);

    Ok((
        StatusCode::CREATED,
        Json(CourseCreatedResponse {
            message: "Course created successfully".to_string(),
            course,
        }),
    ))
}

/// GET /api/colleges?state&city&type&course&search&page&limit
///
/// Best NIRF rank first, unranked last, then name.
pub async fn handle_list_colleges(
    State(state): State<AppState>,
    Query(query): Query<CollegeListQuery>,
) -> Result<Json<CollegeListResponse>, AppError> {
    let college_query = CollegeQuery {
        state: text_param(query.state),
        city: text_param(query.city),
        college_type: enum_param(query.college_type.as_deref(), "type")?,
        course: text_param(query.course),
        search: text_param(query.search),
        page: bounded_param(query.page.as_deref(), DEFAULT_PAGE, u32::MAX),
        limit: bounded_param(query.limit.as_deref(), DEFAULT_LIMIT, MAX_LIMIT),
    };

    let page = state.store.list_colleges(&college_query).await?;

    Ok(Json(CollegeListResponse {
        colleges: page.items,
        pagination: Pagination::new(college_query.page, college_query.limit, page.total),
    }))
}

/// POST /api/colleges
pub async fn handle_create_college(
    State(state): State<AppState>,
    Json(request): Json<NewCollege>,
) -> Result<(StatusCode, Json<CollegeCreatedResponse>), AppError> {
    let college = state.store.insert_college(request.normalized()?).await?;
    info!("Created college {} ({})", college.code, college.id);

    Ok((
        StatusCode::CREATED,
        Json(CollegeCreatedResponse {
            message: "College created successfully".to_string(),
            college,
        }),
    ))
}
