//! Discovery state: the full course list, active filters, current page and
//! the query representation kept in step with them.

use super::config::DEFAULT_PAGE_SIZE;
use super::error::DiscoveryError;
use super::filter::{derive_view, normalize_title, parse_decimal_input, FilterCriteria};
use super::pagination::{page_slice, total_pages, PageRange, PageWindow};
use super::query::{self, QueryParams};
use super::sort::{sort_view, SortOrder};
use super::types::{Course, Instructor};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Where the most recent course load stands.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// Nothing requested yet
    Idle,
    Loading,
    Loaded { at: DateTime<Utc> },
    /// Last load failed; any earlier list is still held
    Failed(DiscoveryError),
}

/// What the results area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewStatus {
    Idle,
    Loading,
    /// Blocking error with a retry action
    Failed { message: String, retryable: bool },
    /// Loaded fine but nothing matches; offer "clear filters"
    Empty,
    Ready,
}

/// Owns the course list and everything derived from it.
#[derive(Debug, Clone)]
pub struct CourseDiscoveryState {
    courses: Vec<Course>,
    instructors: Vec<Instructor>,
    criteria: FilterCriteria,
    sort: SortOrder,
    current_page: usize,
    page_size: usize,
    query: QueryParams,
    filtered: Vec<Course>,
    status: LoadStatus,
}

impl Default for CourseDiscoveryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CourseDiscoveryState {
    pub fn new(page_size: usize) -> Self {
        Self::with_query(page_size, QueryParams::new())
    }

    /// Starts from a page address's query, e.g. a bookmarked search.
    pub fn with_query(page_size: usize, query: QueryParams) -> Self {
        let (criteria, current_page) = query::decode(&query);
        Self {
            courses: Vec::new(),
            instructors: Vec::new(),
            criteria,
            sort: query::read_sort(&query),
            current_page,
            page_size: page_size.max(1),
            query,
            filtered: Vec::new(),
            status: LoadStatus::Idle,
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    /// Full filtered and sorted view, across all pages.
    pub fn filtered(&self) -> &[Course] {
        &self.filtered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Courses on the current page; empty if the page is out of range.
    pub fn current_page_items(&self) -> &[Course] {
        page_slice(&self.filtered, self.current_page, self.page_size)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.page_size)
    }

    pub fn page_range(&self) -> Option<PageRange> {
        PageRange::compute(self.filtered.len(), self.current_page, self.page_size)
    }

    pub fn page_window(&self) -> PageWindow {
        PageWindow::compute(self.current_page, self.total_pages())
    }

    pub fn view_status(&self) -> ViewStatus {
        match &self.status {
            LoadStatus::Idle => ViewStatus::Idle,
            LoadStatus::Loading => ViewStatus::Loading,
            LoadStatus::Failed(err) => ViewStatus::Failed {
                message: err.user_message().to_string(),
                retryable: err.is_retryable(),
            },
            LoadStatus::Loaded { .. } if self.filtered.is_empty() => ViewStatus::Empty,
            LoadStatus::Loaded { .. } => ViewStatus::Ready,
        }
    }

    /// Marks a load as in flight. The current list stays visible.
    pub fn mark_loading(&mut self) {
        self.status = LoadStatus::Loading;
    }

    /// Replaces the list wholesale and re-derives using the criteria encoded
    /// in the query representation.
    pub fn apply_loaded(&mut self, courses: Vec<Course>) {
        let (criteria, page) = query::decode(&self.query);
        self.criteria = criteria;
        self.sort = query::read_sort(&self.query);
        self.current_page = page;
        self.courses = courses;
        self.status = LoadStatus::Loaded { at: Utc::now() };
        self.rederive();
    }

    /// Records a failed load without touching the list.
    pub fn apply_load_failure(&mut self, error: DiscoveryError) {
        self.status = LoadStatus::Failed(error);
    }

    pub fn set_instructors(&mut self, instructors: Vec<Instructor>) {
        self.instructors = instructors;
    }

    pub fn set_title_filter(&mut self, text: &str) {
        self.criteria.title = normalize_title(text);
        self.filter_changed();
    }

    pub fn set_price_bounds(&mut self, min: Option<f64>, max: Option<f64>) {
        self.criteria.min_price = min;
        self.criteria.max_price = max;
        self.filter_changed();
    }

    pub fn set_min_price(&mut self, min: Option<f64>) {
        self.set_price_bounds(min, self.criteria.max_price);
    }

    pub fn set_max_price(&mut self, max: Option<f64>) {
        self.set_price_bounds(self.criteria.min_price, max);
    }

    pub fn set_min_rating(&mut self, value: Option<f64>) {
        self.criteria.min_rating = value;
        self.filter_changed();
    }

    pub fn set_instructor_filter<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria.instructors = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.is_empty())
            .collect();
        self.filter_changed();
    }

    pub fn set_no_lessons(&mut self, on: bool) {
        self.criteria.no_lessons = on;
        self.filter_changed();
    }

    pub fn set_no_materials(&mut self, on: bool) {
        self.criteria.no_materials = on;
        self.filter_changed();
    }

    /// Reorders the view and returns to page 1.
    pub fn set_sort(&mut self, order: SortOrder) {
        self.sort = order;
        query::write_sort(&mut self.query, order);
        self.current_page = 1;
        query::write_page(&mut self.query, 1);
        self.rederive();
    }

    /// Raw form input for the price fields; unparsable text clears the bound.
    pub fn set_price_bounds_input(&mut self, min: &str, max: &str) {
        self.set_price_bounds(parse_decimal_input(min), parse_decimal_input(max));
    }

    /// Raw form input for the rating select.
    pub fn set_min_rating_input(&mut self, value: &str) {
        self.set_min_rating(parse_decimal_input(value));
    }

    /// Clears every criterion and the sort, returns to page 1 and empties
    /// the query.
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.sort = SortOrder::Unsorted;
        self.current_page = 1;
        self.query.clear();
        self.rederive();
    }

    /// Moves to page `n` without clamping; an out-of-range page shows nothing.
    pub fn go_to_page(&mut self, n: usize) {
        self.current_page = n;
        query::write_page(&mut self.query, n);
    }

    /// Adopts an externally changed query (back/forward navigation, pasted link).
    pub fn sync_from_query(&mut self, query: QueryParams) {
        let (criteria, page) = query::decode(&query);
        self.sort = query::read_sort(&query);
        self.query = query;
        self.criteria = criteria;
        self.current_page = page;
        self.rederive();
    }

    fn filter_changed(&mut self) {
        self.current_page = 1;
        query::write_criteria(&mut self.query, &self.criteria);
        query::write_page(&mut self.query, 1);
        self.rederive();
    }

    fn rederive(&mut self) {
        self.filtered = derive_view(&self.courses, &self.criteria);
        sort_view(&mut self.filtered, self.sort);
        debug!(
            total = self.courses.len(),
            matched = self.filtered.len(),
            sort = %self.sort,
            page = self.current_page,
            "Re-derived discovery view"
        );
    }
}
