//! Field checks run before any write.

use chrono::NaiveDate;

use crate::error::{HerdError, HerdResult};
use crate::models::{is_valid_dib, SaleInfo};

pub(crate) fn require_text(field: &str, value: &str) -> HerdResult<()> {
    if value.trim().is_empty() {
        return Err(HerdError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn require_dib(dib: &str) -> HerdResult<()> {
    if !is_valid_dib(dib) {
        return Err(HerdError::validation(format!(
            "DIB must be exactly 4 digits, got '{dib}'"
        )));
    }
    Ok(())
}

/// An ISO calendar date (`YYYY-MM-DD`).
pub(crate) fn require_date(field: &str, value: &str) -> HerdResult<()> {
    require_text(field, value)?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| HerdError::validation(format!("{field} must be a YYYY-MM-DD date, got '{value}'")))
}

pub(crate) fn require_sale(sale: Option<&SaleInfo>) -> HerdResult<SaleInfo> {
    let sale = sale.ok_or_else(|| HerdError::validation("sale info is required"))?;
    require_text("sale destination", &sale.destination)?;
    require_date("sale date", &sale.date)?;
    Ok(sale.clone())
}
