//! Query-string helpers shared by the list endpoints.

use std::str::FromStr;

use serde::Serialize;

use crate::errors::AppError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Parses an optional enum filter. Empty means no filter; anything else must
/// be a known value.
pub fn enum_param<T: FromStr>(raw: Option<&str>, field: &str) -> Result<Option<T>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid {field}: {text}"))),
    }
}

/// Free-text filter; blank means none.
pub fn text_param(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Positive integer with a fallback for missing or unparseable input,
/// clamped to `1..=max`.
pub fn bounded_param(raw: Option<&str>, default: u32, max: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|n| n.clamp(1, i64::from(max)) as u32)
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let limit_i = i64::from(limit.max(1));
        let total_pages = (total + limit_i - 1) / limit_i;
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: i64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::aptitude::Difficulty;

    #[test]
    fn test_bounded_param() {
        assert_eq!(bounded_param(None, 10, 100), 10);
        assert_eq!(bounded_param(Some("abc"), 10, 100), 10);
        assert_eq!(bounded_param(Some("0"), 10, 100), 1);
        assert_eq!(bounded_param(Some("-4"), 10, 100), 1);
        assert_eq!(bounded_param(Some("5000"), 10, 100), 100);
        assert_eq!(bounded_param(Some(" 25 "), 10, 100), 25);
    }

    #[test]
    fn test_enum_param() {
        assert_eq!(enum_param::<Difficulty>(None, "difficulty").unwrap(), None);
        assert_eq!(enum_param::<Difficulty>(Some(""), "difficulty").unwrap(), None);
        assert_eq!(
            enum_param::<Difficulty>(Some("Hard"), "difficulty").unwrap(),
            Some(Difficulty::Hard)
        );
        assert!(enum_param::<Difficulty>(Some("Impossible"), "difficulty").is_err());
    }

    #[test]
    fn test_pagination() {
        let p = Pagination::new(2, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }
}
