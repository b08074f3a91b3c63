use garde::Validate;

use crate::error::{AppError, Result};
use crate::helpers::format::{DEFAULT_WORKING_HOURS, format_hour, new_schedule};
use crate::models::employee::{NewEmployee, Schedule, WORKING_DAYS};
use crate::models::product::NewProduct;
use crate::models::user::{LoginRequest, NewUser};

/// Validates the login form.
///
/// # Arguments
///
/// * `form` - The submitted email and password.
///
/// # Returns
///
/// A `Result<()>` indicating whether the form can be submitted.
pub fn validate_login(form: &LoginRequest) -> Result<()> {
    form.validate()?;
    Ok(())
}

/// Validates the new user form.
pub fn validate_new_user(form: &NewUser) -> Result<()> {
    form.validate()?;
    Ok(())
}

/// Validates the new employee form.
pub fn validate_new_employee(form: &NewEmployee) -> Result<()> {
    if form.name.trim().is_empty() {
        return Err(AppError::Validation("Name cannot be empty".to_string()));
    }
    if !form.salary.is_finite() {
        return Err(AppError::Validation("Salary must be a number".to_string()));
    }
    form.validate()?;
    Ok(())
}

/// Validates the new product form.
pub fn validate_new_product(form: &NewProduct) -> Result<()> {
    if form.name.trim().is_empty() {
        return Err(AppError::Validation("Name cannot be empty".to_string()));
    }
    form.validate()?;
    Ok(())
}

/// Parses a schedule written as `DAY[:START-END]`, hours on a 0-24 clock.
///
/// `monday:9-17` becomes `MONDAY 9:00 AM - 5:00 PM`; a bare `monday` gets the
/// default working hours.
pub fn parse_schedule(input: &str) -> Result<Schedule> {
    let Some((day, hours)) = input.split_once(':') else {
        let mut schedule = new_schedule(DEFAULT_WORKING_HOURS.0, DEFAULT_WORKING_HOURS.1);
        schedule.workday = working_day(input)?;
        return Ok(schedule);
    };

    let workday = working_day(day)?;

    let (start, end) = hours.split_once('-').ok_or_else(|| {
        AppError::Validation(format!("Schedule '{}' must look like DAY:START-END", input))
    })?;
    let start = parse_hour(start)?;
    let end = parse_hour(end)?;
    if start > end {
        return Err(AppError::Validation(format!(
            "Schedule '{}' starts after it ends",
            input
        )));
    }

    Ok(Schedule {
        workday,
        work_start_time: format_hour(start),
        work_end_time: format_hour(end),
    })
}

fn working_day(day: &str) -> Result<String> {
    let workday = day.trim().to_ascii_uppercase();
    if !WORKING_DAYS.contains(&workday.as_str()) {
        return Err(AppError::Validation(format!(
            "'{}' is not a working day",
            day.trim()
        )));
    }
    Ok(workday)
}

fn parse_hour(value: &str) -> Result<u32> {
    let hour: u32 = value
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("'{}' is not an hour", value.trim())))?;
    if hour > 24 {
        return Err(AppError::Validation(format!(
            "Hour {} is outside 0-24",
            hour
        )));
    }
    Ok(hour)
}
