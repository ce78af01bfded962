/// Types for catalog data returned by the course backend
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// A purchasable course as listed by `GET /courses`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Course {
    #[serde(rename = "CourseID")]
    pub id: u64,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Backend sends decimals either as JSON numbers or as numeric strings
    #[serde(deserialize_with = "de::price")]
    pub price: f64,

    #[serde(rename = "ImageURL", default)]
    pub image_url: Option<String>,

    /// 0-5, absent (or 0) when the course has no reviews yet. Text that is
    /// not a number reads as unrated.
    #[serde(default, deserialize_with = "de::lenient_decimal")]
    pub average_rating: Option<f64>,

    #[serde(default)]
    pub instructor_name: Option<String>,

    #[serde(default)]
    pub lesson_count: u32,

    #[serde(default)]
    pub material_count: u32,

    #[serde(default)]
    pub enrollment_count: u32,
}

impl Course {
    /// Rating used by the minimum-rating filter. Zero counts as unrated.
    pub fn effective_rating(&self) -> Option<f64> {
        self.average_rating.filter(|r| *r > 0.0)
    }
}

/// Instructor entry from `GET /courses/instructors`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    #[serde(rename = "UserID")]
    pub user_id: u64,

    #[serde(rename = "FullName")]
    pub full_name: String,
}

mod de {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    impl Decimal {
        fn into_f64<E: serde::de::Error>(self) -> Result<Option<f64>, E> {
            match self {
                Decimal::Number(n) => Ok(Some(n)),
                Decimal::Text(s) if s.trim().is_empty() => Ok(None),
                Decimal::Text(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| E::custom(format!("invalid decimal: {s:?}"))),
            }
        }
    }

    pub fn price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Decimal::deserialize(deserializer)?
            .into_f64::<D::Error>()?
            .ok_or_else(|| serde::de::Error::custom("missing price"))
    }

    pub fn lenient_decimal<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        match Option::<Decimal>::deserialize(deserializer)? {
            Some(value) => Ok(value.into_f64::<D::Error>().unwrap_or_else(|e| {
                debug!(error = %e, "Treating unparsable decimal as absent");
                None
            })),
            None => Ok(None),
        }
    }
}
