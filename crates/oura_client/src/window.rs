//! Date-window pagination.
//!
//! The daily endpoints only take a `start_date`/`end_date` pair, so a page is
//! a window of `page_size` days. Pages walk backward from the end of the
//! requested range: page 1 holds the most recent days, and each continuation
//! moves one window further toward the start date. The last page absorbs
//! whatever is left, so it holds between 1 and `page_size + 1` days, and a
//! range whose end is `n` days after its start yields `ceil(n / page_size)`
//! pages that neither overlap nor leave gaps.

use chrono::{NaiveDate, TimeDelta, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::utils::{format_query_date, parse_calendar_date};
use crate::{OuraError, RangeQuery};

pub const DEFAULT_PAGE_SIZE: i64 = 7;
/// Upper bound on days per request.
pub const MAX_PAGE_SIZE: i64 = 10;

/// Arguments of a `page` call, and the shape of every continuation.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct PageRequest {
    /// First day of the range (YYYY-MM-DD). Defaults to today.
    #[serde(default, alias = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Last day of the range (YYYY-MM-DD). Defaults to today.
    #[serde(default, alias = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// 1-based page number; values below 1 are treated as 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Days per page, clamped into 1..=10. Defaults to 7.
    #[serde(default, alias = "pageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

impl PageRequest {
    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start_date: Some(start.into()),
            end_date: Some(end.into()),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn effective_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn effective_page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Inclusive `[start, end]` range sent for one page. `start <= end` always.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn to_query(&self) -> RangeQuery {
        RangeQuery {
            start_date: Some(format_query_date(self.start)),
            end_date: Some(format_query_date(self.end)),
            next_token: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowPlan {
    pub window: DateWindow,
    /// Request for the following page; `None` on the last page.
    pub continuation: Option<PageRequest>,
}

/// Resolve the window for `req` relative to today's UTC date.
pub fn compute(req: &PageRequest) -> Result<WindowPlan, OuraError> {
    compute_at(req, Utc::now().date_naive())
}

/// Resolve the window for `req` with an explicit notion of "today".
pub fn compute_at(req: &PageRequest, today: NaiveDate) -> Result<WindowPlan, OuraError> {
    let page = req.effective_page();
    let size = req.effective_page_size();
    let end = resolve_date(req.end_date.as_deref(), today)?;
    let start = resolve_date(req.start_date.as_deref(), today)?;

    if (end - start).num_days() > size {
        // An offset past the start of the range lands on the last page.
        let page_end = TimeDelta::try_days((page - 1).saturating_mul(size))
            .and_then(|offset| end.checked_sub_signed(offset))
            .map_or(start, |d| d.max(start));

        if (page_end - start).num_days() > size {
            let window = DateWindow {
                start: page_end - TimeDelta::days(size - 1),
                end: page_end,
            };
            let continuation = PageRequest {
                start_date: req.start_date.clone(),
                end_date: req.end_date.clone(),
                page: Some(page + 1),
                page_size: Some(size),
            };
            return Ok(WindowPlan {
                window,
                continuation: Some(continuation),
            });
        }

        return Ok(WindowPlan {
            window: DateWindow {
                start,
                end: page_end,
            },
            continuation: None,
        });
    }

    let start = if req.start_date.is_none() {
        end.checked_sub_signed(TimeDelta::days(size - 1))
            .ok_or_else(|| OuraError::InvalidDate(format!("{end} is out of range")))?
    } else if start > end {
        return Err(OuraError::InvalidDate(format!(
            "start date {start} is after end date {end}"
        )));
    } else {
        start
    };

    Ok(WindowPlan {
        window: DateWindow { start, end },
        continuation: None,
    })
}

fn resolve_date(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate, OuraError> {
    match value {
        None => Ok(today),
        Some(s) => parse_calendar_date(s).ok_or_else(|| OuraError::InvalidDate(s.to_string())),
    }
}
