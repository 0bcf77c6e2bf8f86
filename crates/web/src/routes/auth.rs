//! Registration, login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::Nav;
use crate::db::ProfileRepository;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{FieldErrors, LoginForm, RegisterForm};
use crate::middleware::{
    Flash, Flashes, RequireAnonymous, clear_current_user, flash_redirect, set_current_user,
};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: Nav,
    pub username: String,
    pub errors: FieldErrors,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub username: String,
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(_: RequireAnonymous, flashes: Flashes) -> impl IntoResponse {
    RegisterTemplate {
        nav: Nav::anonymous(flashes),
        username: String::new(),
        errors: FieldErrors::new(),
    }
}

/// Handle registration form submission.
///
/// Creates the account and its empty profile, then sends the user to log in.
pub async fn register(
    _: RequireAnonymous,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let rerender = |errors: FieldErrors, flashes: Flashes| {
        RegisterTemplate {
            nav: Nav::anonymous(flashes).with(Flash::warning(errors.summary())),
            username: form.username.clone(),
            errors,
        }
        .into_response()
    };

    let username = match form.parse() {
        Ok(username) => username,
        Err(errors) => return Ok(rerender(errors, Flashes::take(&session).await)),
    };

    match AuthService::new(state.pool())
        .register(&username, &form.password1)
        .await
    {
        Ok(user) => {
            tracing::info!(account_id = %user.account_id, "account registered");
            let message = format!(
                "Successfully created account for:  {}. You are able to login.",
                user.username
            );
            Ok(flash_redirect(&session, Flash::success(message), "/login").await)
        }
        Err(AuthError::UserAlreadyExists) => Ok(rerender(
            FieldErrors::single("username", "A user with that username already exists."),
            Flashes::take(&session).await,
        )),
        Err(AuthError::WeakPassword(message)) => Ok(rerender(
            FieldErrors::single("password1", message),
            Flashes::take(&session).await,
        )),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(_: RequireAnonymous, flashes: Flashes) -> impl IntoResponse {
    LoginTemplate {
        nav: Nav::anonymous(flashes),
        username: String::new(),
    }
}

/// Handle login form submission.
///
/// Users whose profile has no name yet are sent to complete it first.
pub async fn login(
    _: RequireAnonymous,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("login failed");
            return Ok(LoginTemplate {
                nav: Nav::anonymous(Flashes::take(&session).await)
                    .with(Flash::warning("Username or Password is incorrect.")),
                username: form.username,
            }
            .into_response());
        }
        Err(e) => return Err(e.into()),
    };

    set_current_user(&session, &user).await?;
    set_sentry_user(user.account_id.as_i32(), &user.username);
    tracing::info!(account_id = %user.account_id, "user logged in");

    let profile = ProfileRepository::new(state.pool())
        .get_by_account(user.account_id)
        .await?;
    let to = if profile.is_some_and(|p| p.is_complete()) {
        "/"
    } else {
        "/profile/new"
    };

    Ok(Redirect::to(to).into_response())
}

/// Handle logout.
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/login"))
}
