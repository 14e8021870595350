//! Typed wrappers for the backend's REST routes.
//!
//! Every wrapper goes through [`ApiClient`], so requests carry the session
//! cookie and transport failures are logged by the request helper. Non-2xx
//! answers become [`ApiError::Status`] with the backend's error code.
//!
//! Session routes (`/auth/self`, `/auth/logout`) live in the session store,
//! which needs the raw response rather than a typed result.

use reqwest::Method;
use serde::Serialize;

use super::error::ApiError;
use super::http::ApiClient;
use super::types::{
    Campaign, CampaignAssignments, CampaignDashboard, GeneratedAssignments, OverviewDay, Slots, Subject,
    TuteeRegistration, TutorMatch, TutorRegistration, TutorSubject, TutorSubjectDetail, TutoringHour,
    TutoringLesson, TutoringSummary, User,
};

// =============================================================================
// ENDPOINTS
// =============================================================================

pub const SEND_LINK_ENDPOINT: &str = "/auth/send-link";
pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const ADMIN_CAMPAIGNS_ENDPOINT: &str = "/admin/campaigns";
pub const ADMIN_SUBJECTS_ENDPOINT: &str = "/admin/subjects";
pub const ADMIN_USERS_ENDPOINT: &str = "/admin/users";
pub const TUTEE_ASSIGNMENTS_ENDPOINT: &str = "/assignments/tutee";
pub const TUTOR_ASSIGNMENTS_ENDPOINT: &str = "/assignments/tutor";

fn validate_endpoint(ticket: &str) -> String {
    format!("/auth/validate?ticket={}", urlencoding::encode(ticket))
}

fn campaign_endpoint(campaign_id: u64, rest: &str) -> String {
    format!("/campaign/{campaign_id}/{rest}")
}

fn admin_campaign_endpoint(campaign_id: u64) -> String {
    format!("/admin/campaign/{campaign_id}")
}

fn admin_campaign_subpath(campaign_id: u64, rest: &str) -> String {
    format!("/admin/campaign/{campaign_id}/{rest}")
}

fn admin_assignments_endpoint(campaign_id: u64, role: Option<&str>) -> String {
    match role {
        Some(role) => format!("/admin/campaign/{campaign_id}/assignments/{role}"),
        None => format!("/admin/campaign/{campaign_id}/assignments"),
    }
}

fn tutoring_endpoint(tutor_subject_id: u64, rest: &str) -> String {
    format!("/tutoring/{tutor_subject_id}/{rest}")
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Debug, Serialize)]
struct SendLinkRequest<'a> {
    mail: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Serialize)]
struct TuteeRegistrationRequest<'a> {
    subjects: &'a [u64],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TutorRegistrationRequest {
    subjects: Vec<u64>,
    max_tutees: Vec<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewHourRequest<'a> {
    tutee_id: u64,
    start_date: &'a str,
    end_date: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HourUpdateRequest<'a> {
    id: u64,
    start_date: &'a str,
    end_date: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewLessonRequest<'a> {
    start_date: &'a str,
    end_date: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LessonUpdateRequest<'a> {
    id: u64,
    start_date: &'a str,
    end_date: &'a str,
    content: &'a str,
}

// =============================================================================
// AUTH
// =============================================================================

/// Ask the backend to mail a login link to `mail` via `POST /auth/send-link`.
///
/// # Errors
///
/// Returns `EMAIL_NOT_REGISTERED` (404) when no account uses this address.
pub async fn send_login_link(client: &ApiClient, mail: &str) -> Result<(), ApiError> {
    client.send_unit(Method::POST, SEND_LINK_ENDPOINT, Some(&SendLinkRequest { mail })).await
}

/// Open a session from a mailed login token via `POST /auth/login`.
///
/// # Errors
///
/// Returns `UNAUTHORIZED` (401) when the token is unknown or expired.
pub async fn login_with_token(client: &ApiClient, token: &str) -> Result<(), ApiError> {
    client.send_unit(Method::POST, LOGIN_ENDPOINT, Some(&LoginRequest { token })).await
}

/// Exchange a single sign-on ticket for a session via `POST /auth/validate`.
///
/// # Errors
///
/// Returns `UNAUTHORIZED` (401) when the ticket is missing or rejected.
pub async fn validate_ticket(client: &ApiClient, ticket: &str) -> Result<(), ApiError> {
    client.send_unit::<()>(Method::POST, &validate_endpoint(ticket), None).await
}

// =============================================================================
// DASHBOARD
// =============================================================================

/// The current user's tutors, grouped by campaign of their school year.
///
/// # Errors
///
/// Returns an error on transport failure, non-2xx status, or decode failure.
pub async fn tutee_assignments(client: &ApiClient) -> Result<Vec<CampaignDashboard<TutorMatch>>, ApiError> {
    client.get_json(TUTEE_ASSIGNMENTS_ENDPOINT).await
}

/// The current user's tutor offers and assigned tutees, grouped by campaign.
///
/// # Errors
///
/// Returns an error on transport failure, non-2xx status, or decode failure.
pub async fn tutor_assignments(client: &ApiClient) -> Result<Vec<CampaignDashboard<TutorSubjectDetail>>, ApiError> {
    client.get_json(TUTOR_ASSIGNMENTS_ENDPOINT).await
}

// =============================================================================
// CAMPAIGN
// =============================================================================

/// Weekly course load of the current user's groups over a campaign.
///
/// # Errors
///
/// Returns `NOT_FOUND` (404) for an unknown campaign, or an error when the
/// backend cannot reach the school agenda.
pub async fn campaign_agenda(client: &ApiClient, campaign_id: u64) -> Result<Vec<OverviewDay>, ApiError> {
    let days: Option<Vec<OverviewDay>> = client.get_json(&campaign_endpoint(campaign_id, "agenda")).await?;
    Ok(days.unwrap_or_default())
}

/// Subjects offered in a campaign.
///
/// # Errors
///
/// Returns an error on transport failure, non-2xx status, or decode failure.
pub async fn campaign_subjects(client: &ApiClient, campaign_id: u64) -> Result<Vec<Subject>, ApiError> {
    client.get_json(&campaign_endpoint(campaign_id, "subjects")).await
}

/// The current user's availability grid for a campaign (empty when never saved).
///
/// # Errors
///
/// Returns an error on transport failure, non-2xx status, or decode failure.
pub async fn availabilities(client: &ApiClient, campaign_id: u64) -> Result<Slots, ApiError> {
    client.get_json(&campaign_endpoint(campaign_id, "availabilities")).await
}

/// Replace the current user's availability grid for a campaign.
///
/// # Errors
///
/// Returns an error on transport failure or non-2xx status.
pub async fn save_availabilities(client: &ApiClient, campaign_id: u64, slots: &Slots) -> Result<(), ApiError> {
    client
        .send_unit(Method::POST, &campaign_endpoint(campaign_id, "availabilities"), Some(slots))
        .await
}

/// Subjects the current user registered for as a tutee.
///
/// # Errors
///
/// Returns an error on transport failure, non-2xx status, or decode failure.
pub async fn tutee_registrations(client: &ApiClient, campaign_id: u64) -> Result<Vec<Subject>, ApiError> {
    client.get_json(&campaign_endpoint(campaign_id, "tutee/registrations")).await
}

/// Replace the current user's tutee registrations with `subject_ids`.
///
/// # Errors
///
/// Returns `BAD_REQUEST` when availabilities were never saved or a subject
/// belongs to another semester.
pub async fn register_tutee(client: &ApiClient, campaign_id: u64, subject_ids: &[u64]) -> Result<(), ApiError> {
    let body = TuteeRegistrationRequest { subjects: subject_ids };
    client
        .send_unit(Method::POST, &campaign_endpoint(campaign_id, "tutee/registrations"), Some(&body))
        .await
}

/// Subjects the current user offers as a tutor, with their tutee capacity.
///
/// # Errors
///
/// Returns an error on transport failure, non-2xx status, or decode failure.
pub async fn tutor_registrations(client: &ApiClient, campaign_id: u64) -> Result<Vec<TutorRegistration>, ApiError> {
    client.get_json(&campaign_endpoint(campaign_id, "tutor/registrations")).await
}

/// Replace the current user's tutor offers with `(subject id, max tutees)` pairs.
///
/// # Errors
///
/// Returns an error on transport failure or non-2xx status.
pub async fn register_tutor(client: &ApiClient, campaign_id: u64, offers: &[(u64, u32)]) -> Result<(), ApiError> {
    let (subjects, max_tutees): (Vec<u64>, Vec<u32>) = offers.iter().copied().unzip();
    let body = TutorRegistrationRequest { subjects, max_tutees };
    client
        .send_unit(Method::POST, &campaign_endpoint(campaign_id, "tutor/registrations"), Some(&body))
        .await
}

// =============================================================================
// ADMIN
// =============================================================================

/// All campaigns.
///
/// # Errors
///
/// Returns `FORBIDDEN` (403) for non-admin sessions.
pub async fn admin_campaigns(client: &ApiClient) -> Result<Vec<Campaign>, ApiError> {
    client.get_json(ADMIN_CAMPAIGNS_ENDPOINT).await
}

/// Create a campaign; the backend echoes it back.
///
/// # Errors
///
/// Returns `FORBIDDEN` (403) for non-admin sessions.
pub async fn create_campaign(client: &ApiClient, campaign: &Campaign) -> Result<Campaign, ApiError> {
    client.send_json(Method::POST, ADMIN_CAMPAIGNS_ENDPOINT, campaign).await
}

/// Update a campaign's dates and registration status.
///
/// # Errors
///
/// Returns `FORBIDDEN` (403) for non-admin sessions.
pub async fn update_campaign(client: &ApiClient, campaign: &Campaign) -> Result<Campaign, ApiError> {
    client.send_json(Method::PATCH, &admin_campaign_endpoint(campaign.id), campaign).await
}

/// All subjects.
///
/// # Errors
///
/// Returns `FORBIDDEN` (403) for non-admin sessions.
pub async fn admin_subjects(client: &ApiClient) -> Result<Vec<Subject>, ApiError> {
    client.get_json(ADMIN_SUBJECTS_ENDPOINT).await
}

/// All users.
///
/// # Errors
///
/// Returns `FORBIDDEN` (403) for non-admin sessions.
pub async fn admin_users(client: &ApiClient) -> Result<Vec<User>, ApiError> {
    let users: Option<Vec<User>> = client.get_json(ADMIN_USERS_ENDPOINT).await?;
    Ok(users.unwrap_or_default())
}

/// One campaign, for its admin page.
///
/// # Errors
///
/// Returns `NOT_FOUND` (404) for an unknown campaign.
pub async fn admin_campaign(client: &ApiClient, campaign_id: u64) -> Result<Campaign, ApiError> {
    client.get_json(&admin_campaign_subpath(campaign_id, "overview")).await
}

/// Every user, with admin details, for a campaign's admin page.
///
/// # Errors
///
/// Returns `NOT_FOUND` (404) for an unknown campaign.
pub async fn admin_campaign_users(client: &ApiClient, campaign_id: u64) -> Result<Vec<User>, ApiError> {
    client.get_json(&admin_campaign_subpath(campaign_id, "users")).await
}

/// Run automatic matching for the campaign's unassigned tutees.
///
/// The result is a proposal; save it with [`save_assignments`].
///
/// # Errors
///
/// Returns `FORBIDDEN` (403) for non-admin sessions.
pub async fn generate_assignments(client: &ApiClient, campaign_id: u64) -> Result<GeneratedAssignments, ApiError> {
    client.get_json(&admin_campaign_subpath(campaign_id, "generate-assignments")).await
}

/// The campaign's assignment board.
///
/// # Errors
///
/// Returns `FORBIDDEN` (403) for non-admin sessions.
pub async fn campaign_assignments(client: &ApiClient, campaign_id: u64) -> Result<CampaignAssignments, ApiError> {
    client.get_json(&admin_assignments_endpoint(campaign_id, None)).await
}

/// Save the edited assignment board.
///
/// # Errors
///
/// Returns `FORBIDDEN` (403) for non-admin sessions.
pub async fn save_assignments(
    client: &ApiClient,
    campaign_id: u64,
    assignments: &CampaignAssignments,
) -> Result<(), ApiError> {
    client
        .send_unit(Method::POST, &admin_assignments_endpoint(campaign_id, None), Some(assignments))
        .await
}

/// Remove a tutor's subject offer from the campaign.
///
/// # Errors
///
/// Returns `FORBIDDEN` (403) for non-admin sessions.
pub async fn delete_tutor_assignment(
    client: &ApiClient,
    campaign_id: u64,
    tutor_subject: &TutorSubject,
) -> Result<(), ApiError> {
    client
        .send_unit(Method::DELETE, &admin_assignments_endpoint(campaign_id, Some("tutor")), Some(tutor_subject))
        .await
}

/// Remove a tutee's registration from the campaign.
///
/// # Errors
///
/// Returns `FORBIDDEN` (403) for non-admin sessions.
pub async fn delete_tutee_assignment(
    client: &ApiClient,
    campaign_id: u64,
    registration: &TuteeRegistration,
) -> Result<(), ApiError> {
    client
        .send_unit(Method::DELETE, &admin_assignments_endpoint(campaign_id, Some("tutee")), Some(registration))
        .await
}

// =============================================================================
// TUTORING
// =============================================================================

/// Subject, tutor, lessons and scheduled hours of one tutor subject.
///
/// # Errors
///
/// Returns `FORBIDDEN` (403) unless the caller is the tutor, one of its
/// tutees, or an administrator.
pub async fn tutoring_summary(client: &ApiClient, tutor_subject_id: u64) -> Result<TutoringSummary, ApiError> {
    client.get_json(&tutoring_endpoint(tutor_subject_id, "summary")).await
}

/// Schedule a tutoring hour with a tutee.
///
/// # Errors
///
/// Returns an error on transport failure, non-2xx status, or decode failure.
pub async fn create_hour(
    client: &ApiClient,
    tutor_subject_id: u64,
    tutee_id: u64,
    start_date: &str,
    end_date: &str,
) -> Result<TutoringHour, ApiError> {
    let body = NewHourRequest { tutee_id, start_date, end_date };
    client.send_json(Method::POST, &tutoring_endpoint(tutor_subject_id, "hours"), &body).await
}

/// Move a scheduled tutoring hour.
///
/// # Errors
///
/// Returns an error on transport failure, non-2xx status, or decode failure.
pub async fn update_hour(
    client: &ApiClient,
    tutor_subject_id: u64,
    hour_id: u64,
    start_date: &str,
    end_date: &str,
) -> Result<TutoringHour, ApiError> {
    let body = HourUpdateRequest { id: hour_id, start_date, end_date };
    let path = tutoring_endpoint(tutor_subject_id, &format!("hour/{hour_id}"));
    client.send_json(Method::PATCH, &path, &body).await
}

/// Cancel a scheduled tutoring hour.
///
/// # Errors
///
/// Returns an error on transport failure or non-2xx status.
pub async fn delete_hour(client: &ApiClient, tutor_subject_id: u64, hour_id: u64) -> Result<(), ApiError> {
    let path = tutoring_endpoint(tutor_subject_id, &format!("hour/{hour_id}"));
    client.send_unit::<()>(Method::DELETE, &path, None).await
}

/// Record a lesson.
///
/// # Errors
///
/// Returns an error on transport failure, non-2xx status, or decode failure.
pub async fn create_lesson(
    client: &ApiClient,
    tutor_subject_id: u64,
    start_date: &str,
    end_date: &str,
    content: &str,
) -> Result<TutoringLesson, ApiError> {
    let body = NewLessonRequest { start_date, end_date, content };
    client.send_json(Method::POST, &tutoring_endpoint(tutor_subject_id, "lessons"), &body).await
}

/// Edit a recorded lesson.
///
/// # Errors
///
/// Returns an error on transport failure, non-2xx status, or decode failure.
pub async fn update_lesson(
    client: &ApiClient,
    tutor_subject_id: u64,
    lesson: &TutoringLesson,
) -> Result<TutoringLesson, ApiError> {
    let body = LessonUpdateRequest {
        id: lesson.id,
        start_date: &lesson.start_date,
        end_date: &lesson.end_date,
        content: &lesson.content,
    };
    let path = tutoring_endpoint(tutor_subject_id, &format!("lesson/{}", lesson.id));
    client.send_json(Method::PATCH, &path, &body).await
}

/// Delete a recorded lesson.
///
/// # Errors
///
/// Returns an error on transport failure or non-2xx status.
pub async fn delete_lesson(client: &ApiClient, tutor_subject_id: u64, lesson_id: u64) -> Result<(), ApiError> {
    let path = tutoring_endpoint(tutor_subject_id, &format!("lesson/{lesson_id}"));
    client.send_unit::<()>(Method::DELETE, &path, None).await
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
