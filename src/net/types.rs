//! Wire shapes for the tutoring backend's REST resources.
//!
//! DESIGN
//! ======
//! These types mirror the JSON the backend sends. Field names are camelCase
//! on the wire, dates stay as the strings the server produced.
//!
//! The backend hides most relations on nested resources: an embedded user
//! carries only its id and names, and registrations omit their subject. Those
//! fields default (or are `None`) when absent. Some responses carry `null`
//! for an empty list; list fields read it as empty.
//!
//! Two optionality encodings matter:
//! - `tutorSubjectId` is `null` for an unassigned tutee. It is modeled as
//!   [`Assignment`] so callers match on intent instead of `None`.
//! - Some fields may be absent *or* `null` (`TuteeRegistration.tutorSubjectId`,
//!   `TutoringHour.id`, `TutoringHour.tuteeId`). These are wrapped in an outer
//!   `Option` that is `None` only when the key is missing, so re-serializing
//!   reproduces the payload exactly.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// USERS
// =============================================================================

/// The authenticated user returned by `/auth/self`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub mail: String,
    pub is_tutor: bool,
    pub is_tutee: bool,
    pub is_admin: bool,
}

impl SessionUser {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A user as embedded in campaign, registration and assignment resources.
///
/// Only `id` and the names are always sent. Admin routes add contact details,
/// groups, roles, `casUsername` and `studyYear`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub mail: String,
    /// School year label (e.g. `"2024-2025"`).
    #[serde(default)]
    pub school_year: String,
    /// Study groups the user belongs to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<String>,
    #[serde(default)]
    pub is_tutor: bool,
    #[serde(default)]
    pub is_tutee: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cas_username: Option<String>,
    /// Year of study (1 or 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_year: Option<u8>,
}

// =============================================================================
// CAMPAIGNS & SUBJECTS
// =============================================================================

/// A tutoring campaign: one semester of registrations and sessions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: u64,
    pub semester: i32,
    pub school_year: String,
    pub start_date: String,
    pub end_date: String,
    /// Free-form status string set by administrators.
    pub registration_status: String,
    pub registration_start_date: String,
    pub registration_end_date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: u64,
    pub semester: i32,
    pub short_name: String,
    pub name: String,
}

/// A subject a tutor registered for, with the number of tutees they accept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorRegistration {
    #[serde(flatten)]
    pub subject: Subject,
    pub max_tutees: u32,
}

/// Availability of one user for one campaign, stored as an undecoded JSON blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterAvailability {
    pub id: u64,
    pub campaign: Campaign,
    pub campaign_id: u64,
    pub user: User,
    pub user_id: u64,
    pub availability_json: String,
}

impl SemesterAvailability {
    /// Decode the availability blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is not a slot map.
    pub fn slots(&self) -> Result<Slots, serde_json::Error> {
        serde_json::from_str(&self.availability_json)
    }
}

// =============================================================================
// ASSIGNMENTS
// =============================================================================

/// Whether a tutee has been matched with a tutor's subject offer.
///
/// Serialized as the offer's id, or `null` when unassigned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum Assignment {
    #[default]
    Unassigned,
    AssignedTo(u64),
}

impl Assignment {
    #[must_use]
    pub fn tutor_subject_id(self) -> Option<u64> {
        match self {
            Self::Unassigned => None,
            Self::AssignedTo(id) => Some(id),
        }
    }

    #[must_use]
    pub fn is_assigned(self) -> bool {
        matches!(self, Self::AssignedTo(_))
    }
}

impl From<Option<u64>> for Assignment {
    fn from(id: Option<u64>) -> Self {
        id.map_or(Self::Unassigned, Self::AssignedTo)
    }
}

impl From<Assignment> for Option<u64> {
    fn from(assignment: Assignment) -> Self {
        assignment.tutor_subject_id()
    }
}

/// A tutor's capacity for one subject.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorSubject {
    pub id: u64,
    pub tutor: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutor_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    pub subject_id: u64,
    pub max_tutees: u32,
    pub total_hours: f64,
}

/// A tutee's registered need for one subject.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuteeRegistration {
    pub id: u64,
    pub tutee: User,
    pub tutee_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    pub subject_id: u64,
    /// `None` when the key is absent, `Some(Unassigned)` when it is `null`.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub tutor_subject_id: Option<Assignment>,
    pub total_hours: f64,
}

impl TuteeRegistration {
    /// Assignment state, treating a missing key as unassigned.
    #[must_use]
    pub fn assignment(&self) -> Assignment {
        self.tutor_subject_id.unwrap_or_default()
    }
}

/// Outcome of the assignment process for one tutee and subject.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuteeAssignment {
    pub id: u64,
    pub tutee: User,
    pub tutee_id: u64,
    pub subject_id: u64,
    pub tutor_subject_id: Assignment,
    pub total_hours: f64,
}

/// Every registration of a campaign, as edited on the admin assignment board.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignAssignments {
    #[serde(deserialize_with = "null_as_default")]
    pub tutees: Vec<TuteeRegistration>,
    #[serde(deserialize_with = "null_as_default")]
    pub tutor_subjects: Vec<TutorSubject>,
}

/// Outcome of an automatic assignment run. Nothing is saved until the board is posted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAssignments {
    /// Registrations that received a `tutorSubjectId` during the run.
    #[serde(default, deserialize_with = "null_as_default")]
    pub affected_tutees: Vec<TuteeRegistration>,
    /// Human-readable run log, one line per entry.
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<String>,
}

// =============================================================================
// DASHBOARD
// =============================================================================

/// A tutee's view of one matched subject.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorMatch {
    /// Tutor subject id, `None` while unassigned.
    pub id: Option<u64>,
    pub subject: Subject,
    pub tutor: User,
    #[serde(default)]
    pub total_hours: f64,
}

/// A tutor's offer for one subject, with the tutees assigned to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorSubjectDetail {
    pub id: u64,
    pub subject: Subject,
    pub subject_id: u64,
    pub max_tutees: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tutees: Vec<TuteeRegistration>,
    pub total_hours: f64,
}

/// One campaign of the current school year with the user's assignments in it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct CampaignDashboard<T> {
    #[serde(flatten)]
    pub campaign: Campaign,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assignments: Vec<T>,
}

// =============================================================================
// TUTORING
// =============================================================================

/// A scheduled tutoring hour. A hour without an id has not been saved yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutoringHour {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub id: Option<Option<u64>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub tutee_id: Option<Option<u64>>,
    pub start_date: String,
    pub end_date: String,
}

impl TutoringHour {
    /// A new, unsaved hour for `tutee_id`.
    #[must_use]
    pub fn new(tutee_id: u64, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self { id: None, tutee_id: Some(Some(tutee_id)), start_date: start_date.into(), end_date: end_date.into() }
    }

    /// The saved id, if any.
    #[must_use]
    pub fn saved_id(&self) -> Option<u64> {
        self.id.flatten()
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        self.saved_id().is_none()
    }
}

/// A tutee and the hours scheduled with them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuteeHours {
    #[serde(flatten)]
    pub tutee: User,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hours: Vec<TutoringHour>,
}

/// Everything shown on a tutor subject's page.
///
/// Tutees other than the caller are filtered out unless the caller is the
/// tutor or an administrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutoringSummary {
    pub subject: Subject,
    pub tutor: User,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lessons: Vec<TutoringLesson>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tutees: Vec<TuteeHours>,
}

/// A recorded tutoring lesson.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutoringLesson {
    pub id: u64,
    pub content: String,
    pub start_date: String,
    pub end_date: String,
}

// =============================================================================
// SLOTS
// =============================================================================

/// Availability grid: a key (`YYYY-MM-DD`) to an ordered list of slot markers.
pub type Slots = BTreeMap<String, Vec<i32>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlotStatus {
    Available,
    Occupied,
}

impl SlotStatus {
    pub const ALL: [SlotStatus; 2] = [SlotStatus::Available, SlotStatus::Occupied];
}

// =============================================================================
// AGENDA
// =============================================================================

/// Course load for one weekday, aggregated over a campaign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewDay {
    pub day: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub periods: Vec<OverviewPeriod>,
}

/// Courses held during one teaching period, by course label and occurrence count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewPeriod {
    pub period: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: BTreeMap<String, u32>,
}

/// Deserialize a field that is present in the payload, even when it is `null`.
///
/// Paired with `#[serde(default)]`, the outer `Option` is `None` only for a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Deserialize a field the backend may send as `null` instead of an empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
