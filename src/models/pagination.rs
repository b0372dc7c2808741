//! Page/offset arithmetic shared by list endpoints

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::config::PaginationConfig;

/// Read an optional query value as a number, treating anything that does
/// not parse as absent
pub fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

/// Effective page request after defaults and bounds are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Resolve raw query values. `page < 1` falls back to 1 and
    /// `per_page < 1` to the configured default.
    pub fn resolve(page: Option<i64>, per_page: Option<i64>, config: &PaginationConfig) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let mut per_page = per_page
            .filter(|p| *p >= 1)
            .unwrap_or(config.default_per_page.max(1));

        if config.max_per_page > 0 {
            per_page = per_page.min(config.max_per_page);
        }

        Self { page, per_page }
    }

    /// Row offset for the SQL OFFSET clause
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}
