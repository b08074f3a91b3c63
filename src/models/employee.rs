use garde::Validate;
use serde::{Deserialize, Serialize};

/// The days an employee can be scheduled on, as the API spells them.
pub const WORKING_DAYS: [&str; 7] = [
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

/// One weekly shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[garde(custom(is_working_day))]
    pub workday: String,
    #[garde(length(min = 1))]
    pub work_start_time: String,
    #[garde(length(min = 1))]
    pub work_end_time: String,
}

fn is_working_day(value: &str, _ctx: &()) -> garde::Result {
    if WORKING_DAYS.contains(&value) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "'{}' is not a working day (expected one of {})",
            value,
            WORKING_DAYS.join(", ")
        )))
    }
}

/// Represents an employee as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub salary: f64,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

/// The payload for creating an employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct NewEmployee {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(length(min = 1))]
    pub phone: String,
    #[garde(range(min = 0.0))]
    pub salary: f64,
    #[garde(dive)]
    pub schedules: Vec<Schedule>,
}
