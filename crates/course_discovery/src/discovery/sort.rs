//! Ordering applied to the filtered view.
//!
//! Sorting runs after [`derive_view`](super::filter::derive_view) so the
//! filter pass stays order-preserving. Sorts are stable: courses that
//! compare equal keep their catalog order.

use super::types::Course;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// How the filtered view is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Catalog order as returned by the backend
    #[default]
    Unsorted,
    RatingHighest,
    RatingLowest,
    EnrollmentHighest,
    EnrollmentLowest,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::Unsorted,
        SortOrder::RatingHighest,
        SortOrder::RatingLowest,
        SortOrder::EnrollmentHighest,
        SortOrder::EnrollmentLowest,
    ];

    /// Query-string value; `None` for the default order.
    pub fn as_query_value(self) -> Option<&'static str> {
        match self {
            SortOrder::Unsorted => None,
            SortOrder::RatingHighest => Some("rating-desc"),
            SortOrder::RatingLowest => Some("rating-asc"),
            SortOrder::EnrollmentHighest => Some("enrollment-desc"),
            SortOrder::EnrollmentLowest => Some("enrollment-asc"),
        }
    }

    fn compare(self, a: &Course, b: &Course) -> Ordering {
        match self {
            SortOrder::Unsorted => Ordering::Equal,
            SortOrder::RatingHighest => rating_key(b).total_cmp(&rating_key(a)),
            SortOrder::RatingLowest => rating_key(a).total_cmp(&rating_key(b)),
            SortOrder::EnrollmentHighest => b.enrollment_count.cmp(&a.enrollment_count),
            SortOrder::EnrollmentLowest => a.enrollment_count.cmp(&b.enrollment_count),
        }
    }
}

/// Unrated courses sort as 0.
fn rating_key(course: &Course) -> f64 {
    course.average_rating.unwrap_or(0.0)
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_query_value() == Some(value))
            .ok_or_else(|| format!("unknown sort order {value:?}"))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value().unwrap_or("catalog"))
    }
}

/// Orders `courses` in place.
pub fn sort_view(courses: &mut [Course], order: SortOrder) {
    if order == SortOrder::Unsorted {
        return;
    }
    courses.sort_by(|a, b| order.compare(a, b));
}
