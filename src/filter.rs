//! JSON `filters` parameter accepted by the list endpoints.
//!
//! The wire format is an array of objects:
//! `[{"property":"workorders.id","value":[116,117],"operator":"in"}]`,
//! with `operator` left out for plain equality.

use crate::error::{Error, Result};
use crate::query::{self, QueryString};
use crate::visits::{self, VISITS_ENDPOINT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

/// Open-ended date filters are expressed as a `between` with these bounds.
pub const MIN_DATE: &str = "1900-01-01";
pub const MAX_DATE: &str = "2099-12-31";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
    #[serde(rename = "between")]
    Between,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub property: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<FilterOperator>,
}

impl Filter {
    pub fn new(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter {
            property: property.into(),
            value: value.into(),
            operator: None,
        }
    }

    pub fn with_operator(
        property: impl Into<String>,
        value: impl Into<Value>,
        operator: FilterOperator,
    ) -> Self {
        Filter {
            property: property.into(),
            value: value.into(),
            operator: Some(operator),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    filters: Vec<Filter>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::new(property, value));
        self
    }

    pub fn where_in<I, T>(mut self, property: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.filters
            .push(Filter::with_operator(property, to_array(values), FilterOperator::In));
        self
    }

    pub fn where_not_in<I, T>(mut self, property: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.filters.push(Filter::with_operator(
            property,
            to_array(values),
            FilterOperator::NotIn,
        ));
        self
    }

    pub fn where_between(
        mut self,
        property: &str,
        start: impl Into<Value>,
        end: impl Into<Value>,
    ) -> Self {
        self.filters.push(Filter::with_operator(
            property,
            Value::Array(vec![start.into(), end.into()]),
            FilterOperator::Between,
        ));
        self
    }

    pub fn where_date_between(self, property: &str, start: NaiveDate, end: NaiveDate) -> Self {
        self.where_between(property, query::format_date(start), query::format_date(end))
    }

    /// A single day, as a `between` with equal bounds.
    pub fn where_date(self, property: &str, date: NaiveDate) -> Self {
        self.where_date_between(property, date, date)
    }

    pub fn where_date_after(self, property: &str, date: NaiveDate) -> Self {
        self.where_between(property, query::format_date(date), MAX_DATE)
    }

    pub fn where_date_before(self, property: &str, date: NaiveDate) -> Self {
        self.where_between(property, MIN_DATE, query::format_date(date))
    }

    pub fn where_work_order_id(self, id: i32) -> Self {
        self.where_eq("workorders.id", id)
    }

    pub fn where_work_order_ids(self, ids: &[i32]) -> Self {
        self.where_in("workorders.id", ids.iter().copied())
    }

    pub fn where_vendor_id(self, id: i32) -> Self {
        self.where_eq("vendors.id", id)
    }

    pub fn where_vendor_ids(self, ids: &[i32]) -> Self {
        self.where_in("vendors.id", ids.iter().copied())
    }

    pub fn where_visit_id(self, id: i32) -> Self {
        self.where_eq("visits.id", id)
    }

    pub fn where_visit_ids(self, ids: &[i32]) -> Self {
        self.where_in("visits.id", ids.iter().copied())
    }

    pub fn where_visit_status(self, status: &str) -> Self {
        self.where_eq("visits.status", status)
    }

    pub fn where_visit_statuses(self, statuses: &[&str]) -> Self {
        self.where_in("visits.status", statuses.iter().copied())
    }

    pub fn where_technician_id(self, id: i32) -> Self {
        self.where_eq("technicians.id", id)
    }

    pub fn where_technician_ids(self, ids: &[i32]) -> Self {
        self.where_in("technicians.id", ids.iter().copied())
    }

    pub fn where_client_id(self, id: i32) -> Self {
        self.where_eq("clients.id", id)
    }

    pub fn where_client_ids(self, ids: &[i32]) -> Self {
        self.where_in("clients.id", ids.iter().copied())
    }

    pub fn where_location_id(self, id: i32) -> Self {
        self.where_eq("locations.id", id)
    }

    pub fn where_location_ids(self, ids: &[i32]) -> Self {
        self.where_in("locations.id", ids.iter().copied())
    }

    pub fn where_scheduled_date_between(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.where_date_between("visits.scheduled_date", start, end)
    }

    pub fn where_actual_date_between(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.where_date_between("visits.actual_date", start, end)
    }

    pub fn where_completed_date_between(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.where_date_between("visits.completed_at", start, end)
    }

    pub fn where_scheduled_date(self, date: NaiveDate) -> Self {
        self.where_date("visits.scheduled_date", date)
    }

    pub fn where_actual_date(self, date: NaiveDate) -> Self {
        self.where_date("visits.actual_date", date)
    }

    pub fn where_completed_date(self, date: NaiveDate) -> Self {
        self.where_date("visits.completed_at", date)
    }

    pub fn where_scheduled_after(self, date: NaiveDate) -> Self {
        self.where_date_after("visits.scheduled_date", date)
    }

    pub fn where_scheduled_before(self, date: NaiveDate) -> Self {
        self.where_date_before("visits.scheduled_date", date)
    }

    pub fn where_actual_after(self, date: NaiveDate) -> Self {
        self.where_date_after("visits.actual_date", date)
    }

    pub fn where_actual_before(self, date: NaiveDate) -> Self {
        self.where_date_before("visits.actual_date", date)
    }

    pub fn add_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn add_filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn build(&self) -> Vec<Filter> {
        self.filters.clone()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.filters)?)
    }

    pub fn to_url_encoded(&self) -> Result<String> {
        let json = self.to_json()?;
        log::debug!("Encoding filters: {}", json);
        Ok(form_urlencoded::byte_serialize(json.as_bytes()).collect())
    }
}

fn to_array<I, T>(values: I) -> Value
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    Value::Array(values.into_iter().map(Into::into).collect())
}

/// `start_date between` covering whole days, from `00:00:00` on `from` to
/// `23:59:59` on `to`.
pub fn date_time_range(from: NaiveDate, to: NaiveDate) -> Result<Filter> {
    if to < from {
        return Err(Error::invalid_argument(format!(
            "end date {} is before start date {}",
            query::format_date(to),
            query::format_date(from)
        )));
    }
    let start = format!("{} 00:00:00", query::format_date(from));
    let end = format!("{} 23:59:59", query::format_date(to));
    Ok(Filter::with_operator(
        "start_date",
        vec![start, end],
        FilterOperator::Between,
    ))
}

/// Visits endpoint with pagination and a `filters` parameter. The filter JSON
/// is form-encoded (`+` for spaces) like [`FilterBuilder::to_url_encoded`].
pub fn filtered_endpoint(start: i32, limit: i32, filters: &FilterBuilder) -> Result<String> {
    visits::VisitQueryParameters::new(start, limit).validate()?;

    let mut qs = QueryString::new();
    qs.push("start", start).push("limit", limit);
    let endpoint = visits::endpoint_with(VISITS_ENDPOINT, &qs);
    if filters.is_empty() {
        return Ok(endpoint);
    }
    Ok(format!("{}&filters={}", endpoint, filters.to_url_encoded()?))
}
