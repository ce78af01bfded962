//! Shareable query-string form of the discovery state.
//!
//! Keys: `title`, `minPrice`, `maxPrice`, `minRating`, `instructor` (repeated
//! once per selected name), `noLessons`, `noMaterials`, `sort` and `page`. A
//! missing key means unconstrained / default. Keys this module does not know
//! about are carried along untouched.

use super::error::DiscoveryError;
use super::filter::{normalize_title, parse_decimal_input, FilterCriteria};
use super::sort::SortOrder;
use url::{form_urlencoded, Url};

pub const KEY_TITLE: &str = "title";
pub const KEY_MIN_PRICE: &str = "minPrice";
pub const KEY_MAX_PRICE: &str = "maxPrice";
pub const KEY_MIN_RATING: &str = "minRating";
pub const KEY_INSTRUCTOR: &str = "instructor";
pub const KEY_NO_LESSONS: &str = "noLessons";
pub const KEY_NO_MATERIALS: &str = "noMaterials";
pub const KEY_SORT: &str = "sort";
pub const KEY_PAGE: &str = "page";

/// Ordered string multimap, the equivalent of a page's search params.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `a=1&b=2`; a leading `?` is accepted.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// Extracts the params from a full page address.
    pub fn from_url(address: &str) -> Result<Self, DiscoveryError> {
        let url = Url::parse(address)?;
        Ok(Self {
            pairs: url.query_pairs().into_owned().collect(),
        })
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Replaces all values for `key` with a single one, keeping the position
    /// of the first existing entry.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = 0usize;
                self.pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        self.pairs.push((key.to_string(), value.into()));
    }

    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serializes to `application/x-www-form-urlencoded`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    fn set_or_delete(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(value) => self.set(key, value),
            None => self.delete(key),
        }
    }

    fn set_flag(&mut self, key: &str, on: bool) {
        self.set_or_delete(key, on.then(|| "true".to_string()));
    }

    fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some("true" | "1"))
    }
}

impl std::fmt::Display for QueryParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

fn format_decimal(value: f64) -> String {
    // `Display` for f64 is the shortest string that parses back to the same value
    value.to_string()
}

/// Writes `criteria` into `params`, removing keys for absent criteria.
///
/// Values that constrain nothing (see [`FilterCriteria::normalized`]) are
/// written as absent, so reading the params back yields the normalized form.
pub fn write_criteria(params: &mut QueryParams, criteria: &FilterCriteria) {
    let criteria = criteria.normalized();
    params.set_or_delete(KEY_TITLE, criteria.title);
    params.set_or_delete(KEY_MIN_PRICE, criteria.min_price.map(format_decimal));
    params.set_or_delete(KEY_MAX_PRICE, criteria.max_price.map(format_decimal));
    params.set_or_delete(KEY_MIN_RATING, criteria.min_rating.map(format_decimal));
    params.delete(KEY_INSTRUCTOR);
    for name in criteria.instructors {
        params.append(KEY_INSTRUCTOR, name);
    }
    params.set_flag(KEY_NO_LESSONS, criteria.no_lessons);
    params.set_flag(KEY_NO_MATERIALS, criteria.no_materials);
}

/// Writes the page number.
pub fn write_page(params: &mut QueryParams, page: usize) {
    params.set(KEY_PAGE, page.to_string());
}

/// Writes the sort order; catalog order removes the key.
pub fn write_sort(params: &mut QueryParams, order: SortOrder) {
    params.set_or_delete(KEY_SORT, order.as_query_value().map(str::to_string));
}

/// Reads the sort order; unknown values fall back to catalog order.
pub fn read_sort(params: &QueryParams) -> SortOrder {
    params
        .get(KEY_SORT)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

/// Reads filter criteria; malformed numbers are ignored.
pub fn read_criteria(params: &QueryParams) -> FilterCriteria {
    FilterCriteria {
        title: params.get(KEY_TITLE).and_then(normalize_title),
        min_price: params.get(KEY_MIN_PRICE).and_then(parse_decimal_input),
        max_price: params.get(KEY_MAX_PRICE).and_then(parse_decimal_input),
        min_rating: params.get(KEY_MIN_RATING).and_then(parse_decimal_input),
        instructors: params
            .get_all(KEY_INSTRUCTOR)
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        no_lessons: params.flag(KEY_NO_LESSONS),
        no_materials: params.flag(KEY_NO_MATERIALS),
    }
}

/// Reads the page number; missing, malformed or zero decodes to 1.
pub fn read_page(params: &QueryParams) -> usize {
    params
        .get(KEY_PAGE)
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Encodes criteria and page into a fresh query representation. Page 0 is
/// written as 1, the first page.
pub fn encode(criteria: &FilterCriteria, page: usize) -> QueryParams {
    let mut params = QueryParams::new();
    write_criteria(&mut params, criteria);
    write_page(&mut params, page.max(1));
    params
}

/// Decodes criteria and page from a query representation.
pub fn decode(params: &QueryParams) -> (FilterCriteria, usize) {
    (read_criteria(params), read_page(params))
}
