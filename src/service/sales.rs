//! Month/year filter for the sales list.

use crate::error::AppError;
use serde::Deserialize;

/// Raw `?year=&month=` query.
#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

/// Validated filter matched against a sale's `YYYY-MM-DD` date.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SalesFilter {
    year: Option<String>,
    /// Always two digits.
    month: Option<String>,
}

impl SalesQuery {
    pub fn into_filter(self) -> Result<SalesFilter, AppError> {
        let year = match self.year.map(|y| y.trim().to_string()).filter(|y| !y.is_empty()) {
            Some(y) if y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()) => Some(y),
            Some(y) => return Err(AppError::BadRequest(format!("invalid year: {}", y))),
            None => None,
        };
        let month = match self.month.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()) {
            Some(m) => match m.parse::<u8>() {
                Ok(n @ 1..=12) => Some(format!("{:02}", n)),
                _ => return Err(AppError::BadRequest(format!("invalid month: {}", m))),
            },
            None => None,
        };
        Ok(SalesFilter { year, month })
    }
}

impl SalesFilter {
    pub fn matches(&self, date: &str) -> bool {
        let year_ok = self.year.as_deref().map_or(true, |y| date.get(0..4) == Some(y));
        let month_ok = self.month.as_deref().map_or(true, |m| date.get(5..7) == Some(m));
        year_ok && month_ok
    }
}
