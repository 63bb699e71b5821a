use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

/// Date pattern used for every date-valued query parameter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years that still render as exactly four digits.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

// RFC 3986 unreserved characters pass through; everything else, space
// included, is percent-encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// An ordered list of query parameters.
///
/// Pairs are rendered in insertion order, so callers control the exact layout
/// of the resulting string:
///
/// ```
/// use visit_query::query::QueryString;
///
/// let mut qs = QueryString::new();
/// qs.push("start", 0);
/// qs.push("limit", 20);
/// assert_eq!(qs.to_string(), "start=0&limit=20");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    pub fn push_date(&mut self, key: impl Into<String>, date: NaiveDate) -> &mut Self {
        self.push(key, format_date(date))
    }

    /// Raw, unencoded pairs in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", encode(key), encode(value))?;
        }
        Ok(())
    }
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, QUERY_VALUE).to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Rejects dates whose year cannot be written as `YYYY`.
pub fn check_year(date: NaiveDate) -> Result<NaiveDate> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Ok(date)
    } else {
        Err(Error::invalid_argument(format!(
            "year {} is outside {}..={}",
            date.year(),
            MIN_YEAR,
            MAX_YEAR
        )))
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| Error::invalid_argument(format!("malformed date {:?}: {}", s, e)))?;
    check_year(date)
}

/// Builds a calendar date, rejecting days that do not exist.
pub fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::invalid_argument(format!(
            "date out of range: {:04}-{:02}-{:02}",
            year, month, day
        ))
    })?;
    check_year(date)
}

pub mod date_format {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_date(&s).map_err(serde::de::Error::custom)
    }
}

pub mod optional_date_format {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        match s.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_date(s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_render_in_insertion_order() {
        let mut qs = QueryString::new();
        qs.push("limit", 20).push("start", 0);
        assert_eq!(qs.to_string(), "limit=20&start=0");
    }

    #[test]
    fn test_empty_query_string() {
        let qs = QueryString::new();
        assert!(qs.is_empty());
        assert_eq!(qs.to_string(), "");
    }

    #[test]
    fn test_single_digit_month_and_day_are_padded() {
        let d = date(2025, 3, 5).unwrap();
        assert_eq!(format_date(d), "2025-03-05");
    }

    #[test]
    fn test_year_is_padded_to_four_digits() {
        let d = date(987, 1, 1).unwrap();
        assert_eq!(format_date(d), "0987-01-01");
    }

    #[test]
    fn test_safe_values_are_not_escaped() {
        let mut qs = QueryString::new();
        qs.push_date("scheduled_date_from", date(2025, 8, 14).unwrap());
        assert_eq!(qs.to_string(), "scheduled_date_from=2025-08-14");
    }

    #[test]
    fn test_unsafe_values_are_escaped() {
        let mut qs = QueryString::new();
        qs.push("status", "in progress&done");
        assert_eq!(qs.to_string(), "status=in%20progress%26done");
        assert_eq!(qs.get("status"), Some("in progress&done"));
    }

    #[test]
    fn test_impossible_date_is_rejected() {
        let err = date(2025, 2, 30).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-08-15").unwrap(), date(2025, 8, 15).unwrap());
        assert!(matches!(
            parse_date("15/08/2025"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_years_outside_four_digits_are_rejected() {
        for year in [0, -1, 10000] {
            assert!(
                matches!(date(year, 8, 5), Err(Error::InvalidArgument(_))),
                "year {} should be rejected",
                year
            );
        }
        assert_eq!(format_date(date(1, 1, 1).unwrap()), "0001-01-01");
        assert_eq!(format_date(date(9999, 12, 31).unwrap()), "9999-12-31");
    }

    #[test]
    fn test_parse_date_rejects_five_digit_year() {
        assert!(matches!(
            parse_date("+10000-08-05"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_date("0000-08-05"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[derive(Debug, serde::Deserialize)]
    struct Dates {
        #[serde(with = "date_format")]
        required: NaiveDate,
        #[serde(default, with = "optional_date_format")]
        optional: Option<NaiveDate>,
    }

    #[test]
    fn test_deserializers_share_parse_date() {
        let dates: Dates =
            serde_json::from_str(r#"{"required": " 2025-08-14 ", "optional": " "}"#).unwrap();
        assert_eq!(dates.required, date(2025, 8, 14).unwrap());
        assert_eq!(dates.optional, None);

        assert!(serde_json::from_str::<Dates>(r#"{"required": "0000-01-01"}"#).is_err());
        assert!(serde_json::from_str::<Dates>(
            r#"{"required": "2025-01-01", "optional": "0000-01-01"}"#
        )
        .is_err());
    }
}
