//! Price quoting for a rental request.
//!
//! Quotes are computed locally from the listing's rates so the borrower sees
//! the cost before committing; the server recomputes the authoritative total
//! when the booking is created. A listing only has to carry a daily rate,
//! the other rates are derived from it when absent.

use serde::{Deserialize, Serialize};

use crate::domain::availability::DateRange;
use crate::domain::entities::Tool;
use crate::error::ValidationError;

/// Hours charged per rental day when billing hourly.
pub const BILLABLE_HOURS_PER_DAY: f64 = 8.0;

/// Discount applied to seven daily rates when a listing has no weekly rate.
pub const WEEKLY_DISCOUNT: f64 = 0.85;

/// Billing basis for a quote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalPeriod {
    Hourly,
    #[default]
    Daily,
    Weekly,
}

impl RentalPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalPeriod::Hourly => "hourly",
            RentalPeriod::Daily => "daily",
            RentalPeriod::Weekly => "weekly",
        }
    }
}

/// A fully itemized price for one rental request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Rental charge before the deposit.
    pub rental: f64,
    /// Refundable security deposit, taken from the listing.
    pub deposit: f64,
    /// What the borrower pays up front: `rental + deposit`.
    pub total: f64,
    /// Billable days in the range, both endpoints counted.
    pub days: i64,
    pub period: RentalPeriod,
}

/// Quotes a rental of `tool` over `range` billed by `period`.
///
/// Hourly billing charges [`BILLABLE_HOURS_PER_DAY`] hours per day, falling
/// back to the daily rate split into that many hours when the listing has no
/// hourly rate. Weekly billing rounds partial weeks up and falls back to
/// seven daily rates at [`WEEKLY_DISCOUNT`] when no weekly rate is set.
pub fn quote(tool: &Tool, range: DateRange, period: RentalPeriod) -> Result<Quote, ValidationError> {
    non_negative("price_per_day", tool.price_per_day)?;
    non_negative("security_deposit", tool.security_deposit)?;
    if let Some(rate) = tool.price_per_hour {
        non_negative("price_per_hour", rate)?;
    }
    if let Some(rate) = tool.price_per_week {
        non_negative("price_per_week", rate)?;
    }

    let days = range.days();
    let rental = match period {
        RentalPeriod::Daily => days as f64 * tool.price_per_day,
        RentalPeriod::Hourly => {
            let hourly = tool
                .price_per_hour
                .unwrap_or(tool.price_per_day / BILLABLE_HOURS_PER_DAY);
            days as f64 * BILLABLE_HOURS_PER_DAY * hourly
        }
        RentalPeriod::Weekly => {
            let weekly = tool
                .price_per_week
                .unwrap_or(tool.price_per_day * 7.0 * WEEKLY_DISCOUNT);
            // round partial weeks up; days is at least 1 by construction
            let weeks = (days + 6) / 7;
            weeks as f64 * weekly
        }
    };
    let deposit = tool.security_deposit;

    Ok(Quote {
        rental,
        deposit,
        total: rental + deposit,
        days,
        period,
    })
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value < 0.0 {
        return Err(ValidationError::NegativeRate { field, value });
    }
    Ok(())
}
