//! Turns `validator` output into the flat `"field: message"` list the API returns.

use crate::app::dto::CarRequest;
use crate::app::error::ServiceError;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// Inclusive bounds for a car's model year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            min: 1950,
            max: 2024,
        }
    }
}

/// `brand_id` -> `brandId`, matching the JSON field names.
fn json_field_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Sorted so the response is stable regardless of map iteration order.
pub fn violations(errors: &ValidationErrors) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let name = json_field_name(&field);
        for err in field_errors.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            out.push(format!("{}: {}", name, message));
        }
    }
    out.sort();
    out
}

pub fn validate_request<T: Validate>(request: &T) -> Result<(), ServiceError> {
    request
        .validate()
        .map_err(|e| ServiceError::Validation(violations(&e)))
}

/// Field checks for a car plus the optional year bounds.
pub fn check_car(request: &CarRequest, years: Option<YearRange>) -> Result<(), ValidationErrors> {
    let mut errors = match request.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(e) => e,
    };
    if let (Some(range), Some(year)) = (years, request.year) {
        if !range.contains(year) {
            let mut err = ValidationError::new("range");
            err.message = Some(Cow::Owned(format!(
                "Year must be between {} and {}",
                range.min, range.max
            )));
            errors.add("year", err);
        }
    }
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_car(request: &CarRequest, years: Option<YearRange>) -> Result<(), ServiceError> {
    check_car(request, years).map_err(|e| ServiceError::Validation(violations(&e)))
}
