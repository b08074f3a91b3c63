use crate::models::employee::Schedule;

/// Default shift used when a schedule is added: 9 AM to 5 PM.
pub const DEFAULT_WORKING_HOURS: (u32, u32) = (9, 17);

/// Formats an hour of the day (0-24) on a 12-hour clock.
pub fn format_hour(hour: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:00 {}", display, period)
}

/// Renders an employee's schedules on one line.
pub fn format_schedules(schedules: &[Schedule]) -> String {
    if schedules.is_empty() {
        return "No schedules".to_string();
    }

    schedules
        .iter()
        .map(|s| format!("{} {} - {}", s.workday, s.work_start_time, s.work_end_time))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A blank schedule for the given working hours; the workday is chosen later.
pub fn new_schedule(start_hour: u32, end_hour: u32) -> Schedule {
    Schedule {
        workday: String::new(),
        work_start_time: format_hour(start_hour),
        work_end_time: format_hour(end_hour),
    }
}
