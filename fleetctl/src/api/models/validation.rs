//! Field checks shared by create and update payloads.

use crate::errors::Error;
use crate::kpi::DeliveryDuration;

pub const PAST_WEEK_DAYS: usize = 7;

fn bad_request(message: String) -> Error {
    Error::BadRequest { message }
}

pub fn non_negative(field: &str, value: f64) -> Result<(), Error> {
    if !value.is_finite() || value < 0.0 {
        return Err(bad_request(format!("{field} must be a non-negative number")));
    }
    Ok(())
}

pub fn non_negative_int(field: &str, value: i32) -> Result<(), Error> {
    if value < 0 {
        return Err(bad_request(format!("{field} must be a non-negative integer")));
    }
    Ok(())
}

pub fn finite(field: &str, value: f64) -> Result<(), Error> {
    if !value.is_finite() {
        return Err(bad_request(format!("{field} must be a finite number")));
    }
    Ok(())
}

pub fn not_blank(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(bad_request(format!("{field} must not be empty")));
    }
    Ok(())
}

pub fn rating(value: f64) -> Result<(), Error> {
    if !value.is_finite() || !(0.0..=5.0).contains(&value) {
        return Err(bad_request("rating must be between 0 and 5".to_string()));
    }
    Ok(())
}

pub fn delivery_time(value: &str) -> Result<(), Error> {
    DeliveryDuration::parse(value)
        .map(|_| ())
        .map_err(|_| bad_request(format!("deliveryTime must be an HH:MM duration, got {value:?}")))
}

/// Seven non-negative integers separated by `|`, Monday first.
pub fn past_week_hours(value: &str) -> Result<(), Error> {
    let parts: Vec<&str> = value.split('|').collect();
    let valid = parts.len() == PAST_WEEK_DAYS && parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    if !valid {
        return Err(bad_request(
            "pastWeekHours must be seven non-negative integers separated by '|'".to_string(),
        ));
    }
    Ok(())
}
