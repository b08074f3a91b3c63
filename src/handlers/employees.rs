use crate::error::Result;
use crate::helpers::format::format_schedules;
use crate::helpers::table::Pagination;
use crate::middleware_layer::access::{authorize, gate};
use crate::models::claims::Role;
use crate::models::employee::{Employee, NewEmployee};
use crate::routes::Action;
use crate::services::api::ApiClient;
use crate::validation::forms::validate_new_employee;

pub const FETCH_FAILED: &str = "Failed to fetch employees. Please try again.";
pub const ADD_FAILED: &str = "Failed to add employee. Please try again.";
pub const EMPTY: &str = "No employees found.";

/// The employees list view.
#[derive(Debug, Default)]
pub struct EmployeesView {
    pub employees: Vec<Employee>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Pagination,
}

/// One rendered employee row.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRow {
    pub name: String,
    pub phone: String,
    pub salary: String,
    pub schedules: String,
}

impl From<&Employee> for EmployeeRow {
    fn from(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            phone: employee.phone.clone(),
            salary: format!("${}", employee.salary),
            schedules: format_schedules(&employee.schedules),
        }
    }
}

impl EmployeesView {
    pub fn new(pagination: Pagination) -> Self {
        Self { pagination, ..Self::default() }
    }

    /// Loads the employees list. Any failure leaves the list empty.
    pub async fn load(&mut self, api: &ApiClient) {
        self.loading = true;
        match api.fetch_employees().await {
            Ok(employees) => {
                tracing::debug!("👷 Loaded {} employees", employees.len());
                self.employees = employees;
                self.error = None;
            }
            Err(e) => {
                self.employees.clear();
                self.error = e.user_message(FETCH_FAILED);
            }
        }
        self.loading = false;
    }

    pub fn actions(&self, role: Option<Role>) -> Vec<Action> {
        gate(Action::NewEmployee.required_roles(), role, || Action::NewEmployee)
            .into_iter()
            .collect()
    }

    /// Creates an employee and appends it to the list.
    pub async fn add(&mut self, api: &ApiClient, form: NewEmployee) -> Result<Employee> {
        let result = Self::try_add(api, form).await;
        match &result {
            Ok(employee) => {
                self.employees.push(employee.clone());
                self.error = None;
            }
            Err(e) => self.error = e.user_message(ADD_FAILED),
        }
        result
    }

    async fn try_add(api: &ApiClient, form: NewEmployee) -> Result<Employee> {
        authorize(Action::NewEmployee.required_roles(), api.session().role(), Action::NewEmployee)?;
        validate_new_employee(&form)?;
        api.add_employee(&form).await
    }

    /// The rows on the current page, formatted for display.
    pub fn rows(&self) -> Vec<EmployeeRow> {
        self.pagination
            .slice(&self.employees)
            .iter()
            .map(EmployeeRow::from)
            .collect()
    }

    /// The text shown instead of the table, if any.
    pub fn placeholder(&self) -> Option<&'static str> {
        if self.loading {
            Some("Loading...")
        } else if self.employees.is_empty() {
            Some(EMPTY)
        } else {
            None
        }
    }
}
