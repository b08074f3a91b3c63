use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crm_console::config::Config;
use crm_console::handlers::employees::{EmployeeRow, EmployeesView};
use crm_console::handlers::login::LoginView;
use crm_console::handlers::products::ProductsView;
use crm_console::handlers::users::UsersView;
use crm_console::helpers::table::Pagination;
use crm_console::models::claims::Role;
use crm_console::models::employee::NewEmployee;
use crm_console::models::product::NewProduct;
use crm_console::models::user::NewUser;
use crm_console::routes::{Route, sidebar};
use crm_console::state::{AppState, Page};
use crm_console::validation::forms::parse_schedule;

#[derive(Parser)]
#[command(
    name = "crm-console",
    about = "Role-gated console for users, employees and products",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Paging options shared by the list views.
#[derive(Args, Clone, Copy)]
struct Paging {
    /// Zero-based page
    #[arg(long, default_value_t = 0)]
    page: usize,
    /// Rows per page (5, 10 or 25); defaults to ROWS_PER_PAGE
    #[arg(long)]
    rows: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and keep the credential for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the stored credential
    Logout,

    /// Show the current session
    Whoami,

    /// Navigate to a console path (e.g. /employees) and render it
    Open {
        path: String,
        #[command(flatten)]
        paging: Paging,
    },

    /// List users
    Users {
        #[command(flatten)]
        paging: Paging,
    },

    /// List employees
    Employees {
        #[command(flatten)]
        paging: Paging,
    },

    /// List products
    Products {
        #[command(flatten)]
        paging: Paging,
    },

    /// Register a user (ADMIN only)
    AddUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "USER")]
        role: Role,
    },

    /// Create an employee (ADMIN only)
    AddEmployee {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value_t = 0.0)]
        salary: f64,
        /// Weekly shift as DAY[:START-END], e.g. monday:9-17 (repeatable)
        #[arg(long = "schedule", value_name = "DAY[:START-END]")]
        schedules: Vec<String>,
    },

    /// Create a product (ADMIN only)
    AddProduct {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0)]
        quantity: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config)
        .await
        .context("Failed to initialize the console")?;

    run(&state, cli.command).await
}

const NOT_SIGNED_IN: &str = "Not signed in. Run `crm-console login` first.";

async fn run(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let mut view = LoginView::default();
            match view.submit(&state.api, &state.session, &email, &password).await {
                Ok(claims) => println!("Signed in as {} ({})", claims.email, claims.role),
                Err(_) => anyhow::bail!(
                    "{}",
                    view.error.unwrap_or_else(|| "Login failed".to_string())
                ),
            }
        }
        Command::Logout => {
            state
                .session
                .logout()
                .await
                .context("Signed out of this console, but the stored credential remains")?;
            println!("Signed out");
        }
        Command::Whoami => {
            let session = state.session.snapshot();
            match (session.email, session.role) {
                (Some(email), Some(role)) => {
                    println!("{} ({})", email, role);
                    if state.session.is_expired(chrono::Utc::now()).await == Some(true) {
                        println!("note: the credential's expiry has passed; the server may reject it");
                    }
                }
                _ => println!("Not signed in"),
            }
        }
        Command::Open { path, paging } => render(state, &path, paging).await?,
        Command::Users { paging } => render(state, "/users", paging).await?,
        Command::Employees { paging } => render(state, "/employees", paging).await?,
        Command::Products { paging } => render(state, "/products", paging).await?,
        Command::AddUser { email, password, role } => {
            let Page::Users(mut view) = state.open("/users").await else {
                anyhow::bail!(NOT_SIGNED_IN);
            };
            let user = match view.add(&state.api, NewUser { email, password, role }).await {
                Ok(user) => user,
                Err(_) => return Err(failure(state, view.error)),
            };
            println!("Created user #{} {} ({})", user.id, user.email, user.role);
        }
        Command::AddEmployee { name, phone, salary, schedules } => {
            let schedules = schedules
                .iter()
                .map(|s| parse_schedule(s))
                .collect::<Result<Vec<_>, _>>()?;
            let Page::Employees(mut view) = state.open("/employees").await else {
                anyhow::bail!(NOT_SIGNED_IN);
            };
            let form = NewEmployee { name, phone, salary, schedules };
            let employee = match view.add(&state.api, form).await {
                Ok(employee) => employee,
                Err(_) => return Err(failure(state, view.error)),
            };
            println!("Created employee #{} {}", employee.id, employee.name);
        }
        Command::AddProduct { name, quantity } => {
            let Page::Products(mut view) = state.open("/products").await else {
                anyhow::bail!(NOT_SIGNED_IN);
            };
            let product = match view.add(&state.api, NewProduct { name, quantity }).await {
                Ok(product) => product,
                Err(_) => return Err(failure(state, view.error)),
            };
            println!("Created product #{} {} (qty {})", product.id, product.name, product.quantity);
        }
    }

    Ok(())
}

/// Turns a view's inline error into the command's failure.
fn failure(state: &AppState, message: Option<String>) -> anyhow::Error {
    match message {
        Some(message) => anyhow::anyhow!(message),
        None if !state.session.is_authenticated() => {
            anyhow::anyhow!("Session ended. Run `crm-console login` again.")
        }
        None => anyhow::anyhow!("Request failed"),
    }
}

fn apply_paging(pagination: &mut Pagination, paging: Paging) -> anyhow::Result<()> {
    if let Some(rows) = paging.rows {
        pagination.set_rows_per_page(rows)?;
    }
    pagination.set_page(paging.page);
    Ok(())
}

fn page_footer(pagination: &Pagination, total: usize) {
    println!(
        "{} total, page {} of {}",
        total,
        pagination.page + 1,
        pagination.page_count(total)
    );
}

async fn render(state: &AppState, path: &str, paging: Paging) -> anyhow::Result<()> {
    let mut page = state.open(path).await;

    match &mut page {
        Page::Users(UsersView { pagination, .. })
        | Page::Employees(EmployeesView { pagination, .. })
        | Page::Products(ProductsView { pagination, .. }) => apply_paging(pagination, paging)?,
        Page::Login(_) | Page::Dashboard(_) => {}
    }

    let session = state.session.snapshot();
    if !session.is_authenticated && page.route() != Route::Login {
        // A 403 while loading ended the session; the next navigation is login.
        println!("Session ended. Run `crm-console login` again.");
        return Ok(());
    }

    println!("== {} ==", page.route());
    let menu = sidebar(&session);
    if !menu.is_empty() {
        let titles: Vec<&str> = menu.iter().map(|item| item.title).collect();
        println!("[{}]", titles.join(" | "));
    }
    if let Some(error) = page.error() {
        println!("! {}", error);
    }
    for action in state.actions(&page) {
        println!("(+) {}", action);
    }

    match &page {
        Page::Login(_) => println!("Not signed in. Run `crm-console login --email .. --password ..`"),
        Page::Dashboard(view) => println!("{}", view.greeting()),
        Page::Users(view) => {
            println!("{:<6} {:<32} {}", "ID", "EMAIL", "ROLE");
            for user in view.page() {
                println!("{:<6} {:<32} {}", user.id, user.email, user.role);
            }
            page_footer(&view.pagination, view.users.len());
        }
        Page::Employees(view) => {
            if let Some(placeholder) = view.placeholder() {
                println!("{}", placeholder);
            } else {
                println!("{:<24} {:<16} {:<10} {}", "NAME", "PHONE", "SALARY", "SCHEDULES");
                for EmployeeRow { name, phone, salary, schedules } in view.rows() {
                    println!("{:<24} {:<16} {:<10} {}", name, phone, salary, schedules);
                }
                page_footer(&view.pagination, view.employees.len());
            }
        }
        Page::Products(view) => {
            println!("{:<6} {:<24} {}", "ID", "NAME", "QUANTITY");
            for product in view.page() {
                println!("{:<6} {:<24} {}", product.id, product.name, product.quantity);
            }
            page_footer(&view.pagination, view.products.len());
        }
    }

    Ok(())
}
