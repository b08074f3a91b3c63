mod common;

use common::*;
use crm_console::error::AppError;
use crm_console::handlers::employees::FETCH_FAILED;
use crm_console::handlers::users::{ADD_FAILED as USER_ADD_FAILED, FETCH_FAILED as USERS_FETCH_FAILED};
use crm_console::handlers::login::{INVALID_CREDENTIALS, LoginView};
use crm_console::models::claims::Role;
use crm_console::models::employee::NewEmployee;
use crm_console::models::product::NewProduct;
use crm_console::models::user::NewUser;
use crm_console::routes::{Action, Route};
use crm_console::state::{AppState, Page};
use crm_console::validation::forms::parse_schedule;

async fn sign_in(state: &AppState, email: &str) {
    let mut view = LoginView::default();
    view.submit(&state.api, &state.session, email, PASSWORD)
        .await
        .unwrap();
    assert_eq!(view.error, None);
}

#[tokio::test]
async fn fresh_start_redirects_protected_views_to_login() {
    let ctx = TestContext::new().await;
    let state = ctx.launch().await;

    assert!(!state.session.is_authenticated());
    for path in ["/employees", "/users", "/products", "/dashboard", "/", "/nowhere"] {
        let page = state.open(path).await;
        assert_eq!(page.route(), Route::Login, "{path} should land on login");
    }
    assert!(ctx.mock.seen_auth.lock().await.is_empty(), "no collection call without a session");
}

#[tokio::test]
async fn admin_sees_employees_and_the_new_employee_action() {
    let ctx = TestContext::new().await;
    let state = ctx.launch().await;
    sign_in(&state, ADMIN_EMAIL).await;

    assert_eq!(state.session.role(), Some(Role::Admin));
    assert_eq!(state.session.email().as_deref(), Some(ADMIN_EMAIL));

    let page = state.open("/employees").await;
    let Page::Employees(view) = &page else {
        panic!("expected employees page, got {:?}", page.route());
    };
    assert_eq!(view.error, None);
    assert_eq!(view.rows().len(), 1);
    assert_eq!(view.rows()[0].salary, "$3200");
    assert_eq!(view.rows()[0].schedules, "MONDAY 9:00 AM - 5:00 PM");
    assert_eq!(state.actions(&page), vec![Action::NewEmployee]);

    let credential = state.session.credential().await.unwrap();
    let seen = ctx.mock.seen_auth.lock().await.clone();
    assert_eq!(seen, vec![Some(format!("Bearer {}", credential.as_str()))]);
}

#[tokio::test]
async fn user_sees_employees_without_the_create_action() {
    let ctx = TestContext::new().await;
    let state = ctx.launch().await;
    sign_in(&state, USER_EMAIL).await;

    assert_eq!(state.session.role(), Some(Role::User));
    let page = state.open("/employees").await;
    assert_eq!(page.route(), Route::Employees);
    assert!(state.actions(&page).is_empty());

    let Page::Employees(mut view) = page else { unreachable!() };
    let result = view
        .add(
            &state.api,
            NewEmployee {
                name: "Sneaky".into(),
                phone: "1".into(),
                salary: 1.0,
                schedules: vec![],
            },
        )
        .await;
    assert!(result.is_err());
    assert_eq!(ctx.mock.employees.lock().await.len(), 1, "nothing reached the API");
    assert!(state.session.is_authenticated());
}

#[tokio::test]
async fn forbidden_fetch_ends_the_session() {
    let ctx = TestContext::new().await;
    let state = ctx.launch().await;
    sign_in(&state, ADMIN_EMAIL).await;
    assert!(ctx.credential_path().exists());

    ctx.forbid(true);
    let page = state.open("/employees").await;
    assert_eq!(page.route(), Route::Employees);
    assert_eq!(page.error(), None, "403 is not shown as an inline message");

    assert!(!state.session.is_authenticated());
    assert_eq!(state.session.credential().await, None);
    assert!(!ctx.credential_path().exists());

    ctx.forbid(false);
    assert_eq!(state.open("/employees").await.route(), Route::Login);
}

#[tokio::test]
async fn corrupt_stored_credential_is_cleared_at_startup() {
    let ctx = TestContext::new().await;
    let path = ctx.credential_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "definitely.not.a-token").unwrap();

    let state = ctx.launch().await;
    assert!(!state.session.is_authenticated());
    assert!(!path.exists());
    assert_eq!(state.open("/dashboard").await.route(), Route::Login);
}

#[tokio::test]
async fn transient_failures_stay_inline_and_keep_the_session() {
    let ctx = TestContext::new().await;
    let state = ctx.launch().await;
    sign_in(&state, USER_EMAIL).await;

    ctx.fail(true);
    let page = state.open("/employees").await;
    assert_eq!(page.error(), Some(FETCH_FAILED));
    let Page::Employees(view) = &page else { unreachable!() };
    assert!(view.employees.is_empty());
    assert_eq!(view.placeholder(), Some("No employees found."));
    assert!(state.session.is_authenticated());

    ctx.fail(false);
    let page = state.open("/employees").await;
    assert_eq!(page.error(), None);
}

#[tokio::test]
async fn session_survives_a_restart() {
    let ctx = TestContext::new().await;
    {
        let state = ctx.launch().await;
        sign_in(&state, ADMIN_EMAIL).await;
    }

    let state = ctx.launch().await;
    assert!(state.session.is_authenticated());
    assert_eq!(state.session.role(), Some(Role::Admin));
    let Page::Dashboard(dashboard) = state.open("/").await else {
        panic!("expected dashboard");
    };
    assert_eq!(dashboard.greeting(), format!("Welcome, {} (ADMIN)", ADMIN_EMAIL));
    assert_eq!(dashboard.menu.len(), 4);
}

#[tokio::test]
async fn bad_password_shows_one_message() {
    let ctx = TestContext::new().await;
    let state = ctx.launch().await;

    let mut view = LoginView::default();
    let result = view
        .submit(&state.api, &state.session, ADMIN_EMAIL, "wrong")
        .await;
    assert!(result.is_err());
    assert_eq!(view.error.as_deref(), Some(INVALID_CREDENTIALS));
    assert!(!state.session.is_authenticated());

    let result = view.submit(&state.api, &state.session, "not-an-email", PASSWORD).await;
    assert!(result.is_err());
    assert_eq!(view.error.as_deref(), Some(INVALID_CREDENTIALS));
}

#[tokio::test]
async fn undecodable_login_credential_recovers_silently() {
    let ctx = TestContext::new().await;
    let state = ctx.launch().await;

    let mut view = LoginView::default();
    let result = view
        .submit(&state.api, &state.session, BROKEN_EMAIL, PASSWORD)
        .await;
    assert!(result.is_err());
    assert_eq!(view.error, None);
    assert!(!state.session.is_authenticated());
    assert!(!ctx.credential_path().exists());
}

#[tokio::test]
async fn admin_creates_records_in_every_collection() {
    let ctx = TestContext::new().await;
    let state = ctx.launch().await;
    sign_in(&state, ADMIN_EMAIL).await;

    let Page::Employees(mut employees) = state.open("/employees").await else { unreachable!() };
    let created = employees
        .add(
            &state.api,
            NewEmployee {
                name: "Bruno".into(),
                phone: "555-0101".into(),
                salary: 2500.0,
                schedules: vec![parse_schedule("tuesday:8-16").unwrap()],
            },
        )
        .await
        .unwrap();
    assert_eq!(created.schedules[0].work_end_time, "4:00 PM");
    assert_eq!(employees.employees.len(), 2);

    let Page::Users(mut users) = state.open("/users").await else { unreachable!() };
    assert_eq!(users.users.len(), 2);
    let user = users
        .add(
            &state.api,
            NewUser {
                email: "new@crm.test".into(),
                password: "pw".into(),
                role: Role::User,
            },
        )
        .await
        .unwrap();
    assert_eq!(user.role, Role::User);
    assert_eq!(user.password, None);
    assert_eq!(users.users.len(), 3);

    let page = state.open("/products").await;
    assert_eq!(state.actions(&page), vec![Action::AddProduct]);
    let Page::Products(mut products) = page else { unreachable!() };
    assert!(products.products.is_empty(), "non-list body reads as empty");
    let product = products
        .add(&state.api, NewProduct { name: "Bolt".into(), quantity: 40 })
        .await
        .unwrap();
    assert_eq!(product.quantity, 40);
    assert_eq!(products.page().len(), 1);
}

#[tokio::test]
async fn invalid_forms_never_reach_the_api() {
    let ctx = TestContext::new().await;
    let state = ctx.launch().await;
    sign_in(&state, ADMIN_EMAIL).await;

    let Page::Products(mut products) = state.open("/products").await else { unreachable!() };
    let before = ctx.mock.seen_auth.lock().await.len();
    let result = products
        .add(&state.api, NewProduct { name: "".into(), quantity: 1 })
        .await;
    assert!(result.is_err());
    assert!(products.error.is_some());
    assert_eq!(ctx.mock.seen_auth.lock().await.len(), before);
}

#[tokio::test]
async fn create_after_the_session_ended_is_refused_without_a_request() {
    let ctx = TestContext::new().await;
    let state = ctx.launch().await;
    sign_in(&state, ADMIN_EMAIL).await;

    ctx.forbid(true);
    let Page::Users(mut view) = state.open("/users").await else { unreachable!() };
    assert!(!state.session.is_authenticated());
    ctx.forbid(false);

    let requests = ctx.mock.seen_auth.lock().await.len();
    let result = view
        .add(
            &state.api,
            NewUser {
                email: "late@crm.test".into(),
                password: "pw".into(),
                role: Role::User,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::AuthorizationDenied)), "{result:?}");
    assert_eq!(view.error, None, "an ended session is not an inline message");
    assert_eq!(ctx.mock.seen_auth.lock().await.len(), requests);
    assert_eq!(ctx.mock.users.lock().await.len(), 2);
    assert_eq!(state.open("/users").await.route(), Route::Login);
}

#[tokio::test]
async fn failed_reload_drops_previously_loaded_users() {
    let ctx = TestContext::new().await;
    let state = ctx.launch().await;
    sign_in(&state, ADMIN_EMAIL).await;

    let Page::Users(mut view) = state.open("/users").await else { unreachable!() };
    assert_eq!(view.users.len(), 2);

    ctx.fail(true);
    view.load(&state.api).await;
    assert!(view.users.is_empty());
    assert!(view.page().is_empty());
    assert_eq!(view.error.as_deref(), Some(USERS_FETCH_FAILED));
    assert!(state.session.is_authenticated());
}

#[tokio::test]
async fn failed_create_shows_the_view_message_once() {
    let ctx = TestContext::new().await;
    let state = ctx.launch().await;
    sign_in(&state, ADMIN_EMAIL).await;

    let Page::Users(mut view) = state.open("/users").await else { unreachable!() };
    ctx.fail(true);
    let result = view
        .add(
            &state.api,
            NewUser {
                email: "later@crm.test".into(),
                password: "pw".into(),
                role: Role::User,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Fetch { status: Some(500), .. })));
    assert_eq!(view.error.as_deref(), Some(USER_ADD_FAILED));
    assert_eq!(view.users.len(), 2);
    assert!(state.session.is_authenticated());
}
