//! Filter criteria and the pure filtering pass over the course list.

use super::types::Course;
use tracing::debug;

/// Active search/filter constraints. `None` (or an empty list) leaves that
/// dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the course title
    pub title: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
    /// Inclusive lower rating bound; unrated courses never match
    pub min_rating: Option<f64>,
    /// Instructor names, any of which may match
    pub instructors: Vec<String>,
    /// Only courses with no lessons yet
    pub no_lessons: bool,
    /// Only courses with no materials yet
    pub no_materials: bool,
}

impl FilterCriteria {
    /// Returns true if no dimension is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.title.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_rating.is_none()
            && self.instructors.is_empty()
            && !self.no_lessons
            && !self.no_materials
    }

    /// Drops values that constrain nothing: an empty title, non-finite
    /// bounds and blank instructor names. This is the form the query string
    /// carries.
    pub fn normalized(&self) -> Self {
        let finite = |value: Option<f64>| value.filter(|v| v.is_finite());
        Self {
            title: self.title.as_deref().and_then(normalize_title),
            min_price: finite(self.min_price),
            max_price: finite(self.max_price),
            min_rating: finite(self.min_rating),
            instructors: self
                .instructors
                .iter()
                .filter(|name| !name.is_empty())
                .cloned()
                .collect(),
            no_lessons: self.no_lessons,
            no_materials: self.no_materials,
        }
    }

    /// Returns true if `course` satisfies every present constraint.
    pub fn matches(&self, course: &Course) -> bool {
        self.matches_title(course)
            && self.matches_price(course)
            && self.matches_rating(course)
            && self.matches_instructor(course)
            && self.matches_counts(course)
    }

    fn matches_title(&self, course: &Course) -> bool {
        match &self.title {
            Some(needle) => course
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }

    fn matches_price(&self, course: &Course) -> bool {
        self.min_price.map_or(true, |min| course.price >= min)
            && self.max_price.map_or(true, |max| course.price <= max)
    }

    fn matches_rating(&self, course: &Course) -> bool {
        match self.min_rating {
            Some(min) => course.effective_rating().is_some_and(|r| r >= min),
            None => true,
        }
    }

    fn matches_instructor(&self, course: &Course) -> bool {
        if self.instructors.is_empty() {
            return true;
        }
        course
            .instructor_name
            .as_ref()
            .is_some_and(|name| self.instructors.iter().any(|selected| selected == name))
    }

    fn matches_counts(&self, course: &Course) -> bool {
        (!self.no_lessons || course.lesson_count == 0)
            && (!self.no_materials || course.material_count == 0)
    }
}

/// Normalizes title input: empty means no title filter.
pub fn normalize_title(input: &str) -> Option<String> {
    if input.is_empty() {
        None
    } else {
        Some(input.to_string())
    }
}

/// Parses a numeric form/query value.
///
/// Blank or non-numeric input is ignored (treated as absent) rather than
/// rejected, so a half-typed price never blocks the view.
pub fn parse_decimal_input(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            debug!(input = %input, "Ignoring non-numeric filter value");
            None
        }
    }
}

/// Returns the courses matching every present criterion, in input order.
pub fn derive_view(courses: &[Course], criteria: &FilterCriteria) -> Vec<Course> {
    if criteria.is_unconstrained() {
        return courses.to_vec();
    }
    courses
        .iter()
        .filter(|course| criteria.matches(course))
        .cloned()
        .collect()
}
