use crate::error::{Error, Result};
use crate::query::{self, QueryString};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const VISITS_ENDPOINT: &str = "/api/ev1/visits";
pub const DEFAULT_START: i32 = 0;
pub const DEFAULT_LIMIT: i32 = 20;

/// Query parameters for the visits endpoint.
///
/// Visits take direct query parameters rather than the JSON `filters` array
/// used elsewhere (see [`crate::filter`]).
///
/// # JSON Format
/// ```json
/// {
///   "start": 0,
///   "limit": 20,
///   "scheduled_date_from": "2025-08-14",
///   "scheduled_date_to": "2025-08-15"
/// }
/// ```
/// Missing fields take their defaults: `start` 0, `limit` 20, filters unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitQueryParameters {
    pub start: i32,
    pub limit: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workorder_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(
        with = "crate::query::optional_date_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub scheduled_date_from: Option<NaiveDate>,
    #[serde(
        with = "crate::query::optional_date_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub scheduled_date_to: Option<NaiveDate>,
    #[serde(
        with = "crate::query::optional_date_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub actual_date_from: Option<NaiveDate>,
    #[serde(
        with = "crate::query::optional_date_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub actual_date_to: Option<NaiveDate>,
}

impl Default for VisitQueryParameters {
    fn default() -> Self {
        VisitQueryParameters {
            start: DEFAULT_START,
            limit: DEFAULT_LIMIT,
            workorder_id: None,
            technician_id: None,
            client_id: None,
            location_id: None,
            status: None,
            scheduled_date_from: None,
            scheduled_date_to: None,
            actual_date_from: None,
            actual_date_to: None,
        }
    }
}

impl VisitQueryParameters {
    pub fn new(start: i32, limit: i32) -> Self {
        VisitQueryParameters {
            start,
            limit,
            ..Default::default()
        }
    }

    pub fn with_workorder(mut self, id: i32) -> Self {
        self.workorder_id = Some(id);
        self
    }

    pub fn with_technician(mut self, id: i32) -> Self {
        self.technician_id = Some(id);
        self
    }

    pub fn with_client(mut self, id: i32) -> Self {
        self.client_id = Some(id);
        self
    }

    pub fn with_location(mut self, id: i32) -> Self {
        self.location_id = Some(id);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_scheduled_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.scheduled_date_from = Some(from);
        self.scheduled_date_to = Some(to);
        self
    }

    pub fn with_actual_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.actual_date_from = Some(from);
        self.actual_date_to = Some(to);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.start < 0 {
            return Err(Error::invalid_argument(format!(
                "start must not be negative, got {}",
                self.start
            )));
        }
        if self.limit < 0 {
            return Err(Error::invalid_argument(format!(
                "limit must not be negative, got {}",
                self.limit
            )));
        }
        let dates = [
            self.scheduled_date_from,
            self.scheduled_date_to,
            self.actual_date_from,
            self.actual_date_to,
        ];
        for date in dates.into_iter().flatten() {
            query::check_year(date)?;
        }
        check_range("scheduled_date", self.scheduled_date_from, self.scheduled_date_to)?;
        check_range("actual_date", self.actual_date_from, self.actual_date_to)?;
        Ok(())
    }

    /// Renders the parameters in the order the visits endpoint documents them.
    /// `start` and `limit` are always present; a blank `status` is skipped.
    pub fn to_query_string(&self) -> Result<QueryString> {
        self.validate()?;

        let mut qs = QueryString::new();
        qs.push("start", self.start).push("limit", self.limit);

        let ids = [
            ("workorder_id", self.workorder_id),
            ("technician_id", self.technician_id),
            ("client_id", self.client_id),
            ("location_id", self.location_id),
        ];
        for (key, id) in ids {
            if let Some(id) = id {
                qs.push(key, id);
            }
        }

        if let Some(status) = self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            qs.push("status", status);
        }

        let dates = [
            ("scheduled_date_from", self.scheduled_date_from),
            ("scheduled_date_to", self.scheduled_date_to),
            ("actual_date_from", self.actual_date_from),
            ("actual_date_to", self.actual_date_to),
        ];
        for (key, date) in dates {
            if let Some(date) = date {
                qs.push_date(key, date);
            }
        }

        Ok(qs)
    }

    /// Path and query, e.g. `/api/ev1/visits?start=0&limit=20`.
    pub fn endpoint(&self) -> Result<String> {
        Ok(endpoint_with(VISITS_ENDPOINT, &self.to_query_string()?))
    }
}

pub(crate) fn endpoint_with(path: &str, qs: &QueryString) -> String {
    let endpoint = if qs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, qs)
    };
    log::debug!("Using endpoint: {}", endpoint);
    endpoint
}

fn check_range(name: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    match (from, to) {
        (Some(from), Some(to)) if to < from => Err(Error::invalid_argument(format!(
            "{}_to ({}) is before {}_from ({})",
            name,
            query::format_date(to),
            name,
            query::format_date(from)
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::date;

    fn sample() -> VisitQueryParameters {
        VisitQueryParameters::new(0, 20)
            .with_scheduled_range(date(2025, 8, 14).unwrap(), date(2025, 8, 15).unwrap())
    }

    #[test]
    fn test_date_range_query_string() {
        let qs = sample().to_query_string().unwrap();
        assert_eq!(
            qs.to_string(),
            "start=0&limit=20&scheduled_date_from=2025-08-14&scheduled_date_to=2025-08-15"
        );
    }

    #[test]
    fn test_defaults_only_emit_pagination() {
        let params = VisitQueryParameters::default();
        assert_eq!(params.endpoint().unwrap(), "/api/ev1/visits?start=0&limit=20");
    }

    #[test]
    fn test_full_parameter_order() {
        let params = VisitQueryParameters::new(40, 10)
            .with_actual_range(date(2025, 1, 2).unwrap(), date(2025, 1, 3).unwrap())
            .with_status("scheduled")
            .with_location(4)
            .with_client(3)
            .with_technician(2)
            .with_workorder(1)
            .with_scheduled_range(date(2025, 1, 1).unwrap(), date(2025, 1, 2).unwrap());

        let keys: Vec<String> = params
            .to_query_string()
            .unwrap()
            .pairs()
            .iter()
            .map(|(k, _)| k.clone())
            .collect();
        assert_eq!(
            keys,
            vec![
                "start",
                "limit",
                "workorder_id",
                "technician_id",
                "client_id",
                "location_id",
                "status",
                "scheduled_date_from",
                "scheduled_date_to",
                "actual_date_from",
                "actual_date_to",
            ]
        );
    }

    #[test]
    fn test_blank_status_is_skipped() {
        let params = VisitQueryParameters::default().with_status("   ");
        assert_eq!(params.to_query_string().unwrap().get("status"), None);
    }

    #[test]
    fn test_negative_pagination_is_rejected() {
        let err = VisitQueryParameters::new(-1, 20).to_query_string().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = VisitQueryParameters::new(0, -5).endpoint().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let params = VisitQueryParameters::default()
            .with_scheduled_range(date(2025, 8, 15).unwrap(), date(2025, 8, 14).unwrap());
        assert!(matches!(params.validate(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_five_digit_year_is_rejected() {
        let far = NaiveDate::from_ymd_opt(10000, 8, 5).unwrap();
        let params = VisitQueryParameters::default().with_scheduled_range(far, far);
        assert!(matches!(
            params.to_query_string(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_single_day_range_is_allowed() {
        let d = date(2025, 8, 14).unwrap();
        let params = VisitQueryParameters::default().with_actual_range(d, d);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_deserialize_from_json() {
        let params: VisitQueryParameters = serde_json::from_str(
            r#"{"scheduled_date_from": "2025-08-14", "scheduled_date_to": "2025-08-15"}"#,
        )
        .unwrap();
        assert_eq!(params, sample());
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"start":0,"limit":20,"scheduled_date_from":"2025-08-14","scheduled_date_to":"2025-08-15"}"#
        );
    }
}
