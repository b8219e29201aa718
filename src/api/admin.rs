//! Admin self-service: change own email and password

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{
        form::FormView,
        user::CredentialsForm,
        Flash, Outcome,
    },
};

use super::AdminUser;

/// Credentials form prefilled with the current email
#[utoipa::path(
    get,
    path = "/admin",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Credentials form"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn edit_credentials(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
) -> AppResult<Json<FormView<CredentialsForm>>> {
    let user = state.services.auth.current_user(&claims).await?;
    Ok(Json(FormView::new(CredentialsForm {
        email: user.email,
        ..Default::default()
    })))
}

/// Update own credentials, confirmed with the current password
#[utoipa::path(
    put,
    path = "/admin",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CredentialsForm,
    responses(
        (status = 200, description = "Credentials updated", body = Outcome),
        (status = 422, description = "Invalid form or wrong current password", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_credentials(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
    Json(form): Json<CredentialsForm>,
) -> AppResult<Json<Outcome>> {
    state.services.auth.update_credentials(&claims, form).await?;
    Ok(Json(Outcome::new(Flash::success("updated_successfully"), "/books")))
}
