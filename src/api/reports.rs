//! `/api/reports` handlers

use axum::extract::{Query, State};
use axum::response::Response;
use chrono::{Datelike, Local};
use serde::Deserialize;

use crate::models::CardId;
use crate::reports::{MonthlyReport, ReportFilter, YearlyReport};

use super::error::ApiError;
use super::extract::field_id;
use super::response::ok;
use super::AppState;

const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub year: Option<String>,
    pub month: Option<String>,
    pub card_id: Option<String>,
}

impl ReportQuery {
    /// Strict parsing; a missing year or month means the current one
    fn to_filter(&self, with_month: bool) -> Result<ReportFilter, ApiError> {
        let today = Local::now().date_naive();

        let year = match non_empty(&self.year) {
            None => today.year(),
            Some(raw) => raw
                .parse::<i32>()
                .ok()
                .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
                .ok_or_else(|| {
                    ApiError::bad_request("INVALID_YEAR", "Invalid year parameter").with_details(
                        format!("Year must be a valid number between {} and {}", MIN_YEAR, MAX_YEAR),
                    )
                })?,
        };

        let month = if with_month {
            Some(match non_empty(&self.month) {
                None => today.month(),
                Some(raw) => raw
                    .parse::<u32>()
                    .ok()
                    .filter(|m| (1..=12).contains(m))
                    .ok_or_else(|| {
                        ApiError::bad_request("INVALID_MONTH", "Invalid month parameter")
                            .with_details("Month must be a number between 1 and 12")
                    })?,
            })
        } else {
            None
        };

        let card_id = non_empty(&self.card_id)
            .map(|raw| field_id::<CardId>(raw, "INVALID_CARD_ID", "card"))
            .transpose()?;

        Ok(ReportFilter {
            year,
            month,
            card_id,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub async fn monthly(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let filter = query.to_filter(true)?;
    let report = MonthlyReport::generate(&state.storage, &filter)?;
    Ok(ok("Monthly report generated successfully", report))
}

pub async fn yearly(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let filter = query.to_filter(false)?;
    let report = YearlyReport::generate(&state.storage, &filter)?;
    Ok(ok("Yearly report generated successfully", report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(year: Option<&str>, month: Option<&str>, card: Option<&str>) -> ReportQuery {
        ReportQuery {
            year: year.map(String::from),
            month: month.map(String::from),
            card_id: card.map(String::from),
        }
    }

    #[test]
    fn test_defaults_to_current_period() {
        let today = Local::now().date_naive();
        let filter = q(None, None, None).to_filter(true).unwrap();
        assert_eq!(filter.year, today.year());
        assert_eq!(filter.month, Some(today.month()));

        let yearly = q(Some("2024"), Some("5"), None).to_filter(false).unwrap();
        assert_eq!(yearly.year, 2024);
        assert!(yearly.month.is_none());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let code = |query: ReportQuery| query.to_filter(true).unwrap_err().code();

        assert_eq!(code(q(Some("1999"), None, None)), "INVALID_YEAR");
        assert_eq!(code(q(Some("2101"), None, None)), "INVALID_YEAR");
        assert_eq!(code(q(Some("abc"), None, None)), "INVALID_YEAR");
        assert_eq!(code(q(Some("2024"), Some("0"), None)), "INVALID_MONTH");
        assert_eq!(code(q(Some("2024"), Some("13"), None)), "INVALID_MONTH");
        assert_eq!(code(q(Some("2024"), Some("1"), Some("x"))), "INVALID_CARD_ID");
    }

    #[test]
    fn test_bounds_accepted() {
        assert_eq!(q(Some("2000"), Some("1"), None).to_filter(true).unwrap().year, 2000);
        assert_eq!(q(Some("2100"), Some("12"), None).to_filter(true).unwrap().year, 2100);
    }
}
