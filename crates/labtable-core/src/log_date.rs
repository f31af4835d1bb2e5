//! Day selector of the log viewer (`MM/DD/YYYY`)

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};

/// A calendar day whose test log can be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogDate(NaiveDate);

impl LogDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse `MM/DD/YYYY`. Single-digit month and day are accepted.
    pub fn parse(input: &str) -> Result<Self> {
        NaiveDate::parse_from_str(input.trim(), "%m/%d/%Y")
            .map(Self)
            .map_err(|_| Error::invalid_log_date(input))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// URL path prefix of the day's endpoints, e.g. `10/19/2026`.
    pub fn path_segment(&self) -> String {
        format!(
            "{:02}/{:02}/{:04}",
            self.0.month(),
            self.0.day(),
            self.0.year()
        )
    }
}

impl FromStr for LogDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for LogDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_path_segment() {
        let date = LogDate::parse("10/19/2026").unwrap();
        assert_eq!(date.path_segment(), "10/19/2026");
        assert_eq!(date.to_string(), "10/19/2026");
    }

    #[test]
    fn test_single_digit_parts_are_padded() {
        let date: LogDate = "3/7/2025".parse().unwrap();
        assert_eq!(date.path_segment(), "03/07/2025");
    }

    #[test]
    fn test_invalid_dates_rejected() {
        assert!(matches!(
            LogDate::parse("2026-10-19"),
            Err(Error::InvalidLogDate { .. })
        ));
        assert!(LogDate::parse("13/40/2020").is_err());
        assert!(LogDate::parse("").is_err());
    }
}
