//! Handlers for the `/auth` resource: login, one-time passwords, password
//! changes, customer registration and profile management.
//!
//! Every handler forwards to the backend service exactly once.

use axum::extract::State;
use salon_core::validation::{Constraint, FieldKind, FieldRule, RequestSchema, Schema};
use serde::{Deserialize, Serialize};

use crate::extract::{JsonBody, ProfileForm, ValidatedJson};
use crate::middleware::context::BearerToken;
use crate::response::{from_reply, ApiResult};
use crate::state::AppState;

const PASSWORD_RULES: &[Constraint] = &[Constraint::MinLength(8), Constraint::MaxLength(128)];
const OTP_RULES: &[Constraint] = &[Constraint::Pattern(r"^[0-9]{4,6}$")];
const NAME_RULES: &[Constraint] = &[Constraint::MaxLength(50)];
const PHONE_RULES: &[Constraint] = &[Constraint::Pattern(r"^\+?[0-9]{7,15}$")];
const GENDER_RULES: &[Constraint] = &[Constraint::OneOf(&["male", "female", "other"])];

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl RequestSchema for LoginRequest {
    const SCHEMA: &'static Schema = &Schema {
        name: "login",
        fields: &[
            FieldRule::required("email", FieldKind::String).with(&[Constraint::Email]),
            FieldRule::required("password", FieldKind::String),
        ],
    };
}

/// Request body for `POST /auth/send-otp`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

impl RequestSchema for SendOtpRequest {
    const SCHEMA: &'static Schema = &Schema {
        name: "send-otp",
        fields: &[FieldRule::required("email", FieldKind::String).with(&[Constraint::Email])],
    };
}

/// Request body for `POST /auth/verify-otp`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

impl RequestSchema for VerifyOtpRequest {
    const SCHEMA: &'static Schema = &Schema {
        name: "verify-otp",
        fields: &[
            FieldRule::required("email", FieldKind::String).with(&[Constraint::Email]),
            FieldRule::required("otp", FieldKind::String).with(OTP_RULES),
        ],
    };
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub password: String,
}

impl RequestSchema for ResetPasswordRequest {
    const SCHEMA: &'static Schema = &Schema {
        name: "reset-password",
        fields: &[
            FieldRule::required("email", FieldKind::String).with(&[Constraint::Email]),
            FieldRule::required("otp", FieldKind::String).with(OTP_RULES),
            FieldRule::required("password", FieldKind::String).with(PASSWORD_RULES),
        ],
    };
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl RequestSchema for ChangePasswordRequest {
    const SCHEMA: &'static Schema = &Schema {
        name: "change-password",
        fields: &[
            FieldRule::required("old_password", FieldKind::String),
            FieldRule::required("new_password", FieldKind::String).with(PASSWORD_RULES),
        ],
    };
}

/// Request body for `POST /auth/create-customer`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl RequestSchema for CreateCustomerRequest {
    const SCHEMA: &'static Schema = &Schema {
        name: "create-customer",
        fields: &[
            FieldRule::required("first_name", FieldKind::String).with(NAME_RULES),
            FieldRule::required("last_name", FieldKind::String).with(NAME_RULES),
            FieldRule::required("email", FieldKind::String).with(&[Constraint::Email]),
            FieldRule::required("phone", FieldKind::String).with(PHONE_RULES),
            FieldRule::required("password", FieldKind::String).with(PASSWORD_RULES),
        ],
    };
}

/// Fields accepted by `update-profile`, all optional.
///
/// Only used for its schema; the sanitized fields are forwarded as JSON or
/// multipart text parts.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {}

impl RequestSchema for UpdateProfileRequest {
    const SCHEMA: &'static Schema = &Schema {
        name: "update-profile",
        fields: &[
            FieldRule::optional("first_name", FieldKind::String).with(NAME_RULES),
            FieldRule::optional("last_name", FieldKind::String).with(NAME_RULES),
            FieldRule::optional("phone", FieldKind::String).with(PHONE_RULES),
            FieldRule::optional("date_of_birth", FieldKind::String).with(&[Constraint::Date]),
            FieldRule::optional("gender", FieldKind::String).with(GENDER_RULES),
        ],
    };
}

/// Request body for `POST /auth/profile-setup`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileSetupRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl RequestSchema for ProfileSetupRequest {
    const SCHEMA: &'static Schema = &Schema {
        name: "profile-setup",
        fields: &[
            FieldRule::required("first_name", FieldKind::String).with(NAME_RULES),
            FieldRule::required("last_name", FieldKind::String).with(NAME_RULES),
            FieldRule::optional("phone", FieldKind::String).with(PHONE_RULES),
            FieldRule::optional("date_of_birth", FieldKind::String).with(&[Constraint::Date]),
            FieldRule::optional("gender", FieldKind::String).with(GENDER_RULES),
        ],
    };
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> ApiResult {
    let reply = state.backend.login(&input).await?;
    tracing::info!("Customer logged in");
    Ok(from_reply(reply, "Login successful"))
}

/// POST /api/auth/send-otp
pub async fn send_otp(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SendOtpRequest>,
) -> ApiResult {
    let reply = state.backend.send_otp(&input).await?;
    Ok(from_reply(reply, "OTP sent successfully"))
}

/// POST /api/auth/verify-otp
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<VerifyOtpRequest>,
) -> ApiResult {
    let reply = state.backend.verify_otp(&input).await?;
    Ok(from_reply(reply, "OTP verified successfully"))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult {
    let reply = state.backend.reset_password(&input).await?;
    Ok(from_reply(reply, "Password reset successfully"))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult {
    let reply = state.backend.change_password(&token, &input).await?;
    Ok(from_reply(reply, "Password changed successfully"))
}

/// POST /api/auth/create-customer
pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCustomerRequest>,
) -> ApiResult {
    let reply = state.backend.create_customer(&input).await?;
    tracing::info!("Customer account created");
    Ok(from_reply(reply, "Account created successfully"))
}

/// GET /api/auth/get-profile
pub async fn get_profile(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult {
    let reply = state.backend.get_profile(&token).await?;
    Ok(from_reply(reply, "Profile fetched successfully"))
}

/// POST | PATCH /api/auth/update-profile
///
/// Accepts JSON, or multipart with an optional `profile_image` part.
pub async fn update_profile(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    form: ProfileForm<UpdateProfileRequest>,
) -> ApiResult {
    let reply = state
        .backend
        .update_profile(&token, &form.fields, form.photo)
        .await?;
    Ok(from_reply(reply, "Profile updated successfully"))
}

/// POST /api/auth/profile-setup
pub async fn profile_setup(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ValidatedJson(input): ValidatedJson<ProfileSetupRequest>,
) -> ApiResult {
    let reply = state.backend.profile_setup(&token, &input).await?;
    Ok(from_reply(reply, "Profile setup completed"))
}

/// POST /api/auth/logout
///
/// The body is forwarded unchanged.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    JsonBody(body): JsonBody,
) -> ApiResult {
    let reply = state.backend.logout(&token, &body).await?;
    Ok(from_reply(reply, "Logged out successfully"))
}
