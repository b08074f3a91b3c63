use std::sync::Arc;

use crate::config::{Config, SessionBackend};
use crate::error::Result;
use crate::handlers::dashboard::DashboardView;
use crate::handlers::employees::EmployeesView;
use crate::handlers::login::LoginView;
use crate::handlers::products::ProductsView;
use crate::handlers::users::UsersView;
use crate::helpers::table::Pagination;
use crate::repositories::credential::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, RedisCredentialStore,
};
use crate::routes::{Action, Route, resolve};
use crate::services::api::ApiClient;
use crate::services::session::SessionCore;

/// A rendered view.
#[derive(Debug)]
pub enum Page {
    Login(LoginView),
    Dashboard(DashboardView),
    Users(UsersView),
    Employees(EmployeesView),
    Products(ProductsView),
}

impl Page {
    pub fn route(&self) -> Route {
        match self {
            Page::Login(_) => Route::Login,
            Page::Dashboard(_) => Route::Dashboard,
            Page::Users(_) => Route::Users,
            Page::Employees(_) => Route::Employees,
            Page::Products(_) => Route::Products,
        }
    }

    /// The inline error the view shows, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Page::Login(view) => view.error.as_deref(),
            Page::Dashboard(_) => None,
            Page::Users(view) => view.error.as_deref(),
            Page::Employees(view) => view.error.as_deref(),
            Page::Products(view) => view.error.as_deref(),
        }
    }
}

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// The session core.
    pub session: Arc<SessionCore>,
    /// The collections client.
    pub api: ApiClient,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// Opens the configured credential slot, restores the session from it and
    /// builds the API client around that session.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn CredentialStore> = match config.session_backend {
            SessionBackend::File => {
                let store = FileCredentialStore::for_origin(&config.session_dir, &config.api_base_url);
                tracing::info!("✅ File credential store at {}", store.path().display());
                Arc::new(store)
            }
            SessionBackend::Memory => {
                tracing::info!("✅ In-memory credential store");
                Arc::new(MemoryCredentialStore::new())
            }
            SessionBackend::Redis => {
                Arc::new(RedisCredentialStore::connect(&config.redis_url, &config.api_base_url).await?)
            }
        };

        Self::with_store(config, store).await
    }

    /// Creates an `AppState` over an already opened credential slot.
    pub async fn with_store(config: &Config, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let session = SessionCore::start(store).await;
        tracing::info!("✅ Session core started (authenticated: {})", session.is_authenticated());

        let api = ApiClient::new(&config.api_base_url, config.request_timeout, session.clone())?;
        tracing::info!("✅ API client ready for {}", config.api_base_url);

        Ok(Self {
            config: config.clone(),
            session,
            api,
        })
    }

    /// Navigates to `path` and renders the view it lands on.
    ///
    /// List views load their collection before returning.
    pub async fn open(&self, path: &str) -> Page {
        let session = self.session.snapshot();
        let route = resolve(path, &session);
        tracing::debug!("🧭 {} -> {}", path, route);

        let pagination = Pagination::new(self.config.rows_per_page);
        match route {
            Route::Login => Page::Login(LoginView::default()),
            Route::Users => {
                let mut view = UsersView::new(pagination);
                view.load(&self.api).await;
                Page::Users(view)
            }
            Route::Employees => {
                let mut view = EmployeesView::new(pagination);
                view.load(&self.api).await;
                Page::Employees(view)
            }
            Route::Products => {
                let mut view = ProductsView::new(pagination);
                view.load(&self.api).await;
                Page::Products(view)
            }
            Route::Dashboard | Route::Root => match DashboardView::render(&session) {
                Some(view) => Page::Dashboard(view),
                None => Page::Login(LoginView::default()),
            },
        }
    }

    /// The actions visible on `page` for the current role.
    pub fn actions(&self, page: &Page) -> Vec<Action> {
        let role = self.session.role();
        match page {
            Page::Users(view) => view.actions(role),
            Page::Employees(view) => view.actions(role),
            Page::Products(view) => view.actions(role),
            Page::Login(_) | Page::Dashboard(_) => Vec::new(),
        }
    }
}
