//! Profile completion, detail and update.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use super::Nav;
use crate::db::{ProfileRepository, RepositoryError};
use crate::error::AppError;
use crate::filters;
use crate::forms::{FieldErrors, ProfileForm};
use crate::middleware::{Flash, Flashes, OwnedProfile, RequireAuth, flash_redirect};
use crate::models::{CurrentUser, Profile};
use crate::state::AppState;

/// Profile form page (complete or update).
#[derive(Template, WebTemplate)]
#[template(path = "profile/form.html")]
pub struct ProfileFormTemplate {
    pub nav: Nav,
    pub title: &'static str,
    pub action: String,
    pub form: ProfileForm,
    pub errors: FieldErrors,
}

/// Profile detail page.
#[derive(Template, WebTemplate)]
#[template(path = "profile/detail.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub profile: ProfileView,
}

/// Display-ready profile.
pub struct ProfileView {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub start_date: String,
}

impl From<&Profile> for ProfileView {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.as_i32(),
            username: profile.username.clone().unwrap_or_default(),
            name: profile.display_name(),
            phone: profile.phone.clone(),
            email: profile.email.clone(),
            address: profile.address.clone(),
            start_date: profile.start_date.format("%B %-d, %Y").to_string(),
        }
    }
}

const COMPLETE_TITLE: &str = "Complete Profile Information";
const UPDATE_TITLE: &str = "Update Profile";

/// Save the form, or render it again with its errors.
async fn save(
    state: &AppState,
    session: &Session,
    user: CurrentUser,
    profile: &Profile,
    title: &'static str,
    action: String,
    form: ProfileForm,
) -> Result<Response, AppError> {
    let input = match form.parse() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(ProfileFormTemplate {
                nav: Nav::user(user, Flashes::take(session).await),
                title,
                action,
                form,
                errors,
            }
            .into_response());
        }
    };

    ProfileRepository::new(state.pool())
        .update(profile.id, &input)
        .await?;
    tracing::info!(profile_id = %profile.id, "profile saved");

    let verb = if title == COMPLETE_TITLE { "created" } else { "updated" };
    let message = format!(
        "Successfully {verb} profile for:  {} {}",
        input.first_name, input.last_name
    );
    Ok(flash_redirect(session, Flash::success(message), "/").await)
}

async fn own_profile(state: &AppState, user: &CurrentUser) -> Result<Profile, AppError> {
    ProfileRepository::new(state.pool())
        .get(user.profile_id)
        .await?
        .ok_or(AppError::Database(RepositoryError::NotFound))
}

/// Display the profile completion form for the logged-in user.
pub async fn create_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    flashes: Flashes,
) -> Result<Response, AppError> {
    let profile = own_profile(&state, &user).await?;
    Ok(ProfileFormTemplate {
        nav: Nav::user(user, flashes),
        title: COMPLETE_TITLE,
        action: "/profile/new".to_string(),
        form: ProfileForm::from(&profile),
        errors: FieldErrors::new(),
    }
    .into_response())
}

/// Handle profile completion.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let profile = own_profile(&state, &user).await?;
    save(&state, &session, user, &profile, COMPLETE_TITLE, "/profile/new".to_string(), form).await
}

/// Display a profile.
pub async fn show(OwnedProfile { user, profile }: OwnedProfile, flashes: Flashes) -> impl IntoResponse {
    ProfileTemplate {
        nav: Nav::user(user, flashes),
        profile: ProfileView::from(&profile),
    }
}

/// Display the profile update form.
pub async fn update_page(
    OwnedProfile { user, profile }: OwnedProfile,
    flashes: Flashes,
) -> impl IntoResponse {
    ProfileFormTemplate {
        nav: Nav::user(user, flashes),
        title: UPDATE_TITLE,
        action: format!("/profile/{}/update", profile.id),
        form: ProfileForm::from(&profile),
        errors: FieldErrors::new(),
    }
}

/// Handle profile update.
pub async fn update(
    OwnedProfile { user, profile }: OwnedProfile,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let action = format!("/profile/{}/update", profile.id);
    save(&state, &session, user, &profile, UPDATE_TITLE, action, form).await
}
