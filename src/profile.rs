//! Profile data model and normalization of raw store records.
//!
//! The document store hands over loosely-typed rows: fields go missing,
//! numbers arrive as strings, and the preferences blob is sometimes a
//! JSON-encoded string instead of an object. [`normalize_profile`] turns any
//! such row into a canonical [`UserProfile`] without ever failing; malformed
//! pieces degrade to empty values and the rest of the record keeps scoring.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use ts_rs::TS;

/// Whether an enrollment is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum EnrollmentStatus {
    Active,
    Inactive,
}

/// A topic taught inside a course, owned by that course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Topic {
    pub name: String,
    pub course_id: String,
}

/// One course a user is enrolled in.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CourseEnrollment {
    pub course_id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub status: EnrollmentStatus,
    pub topics: Vec<Topic>,
}

/// Structured study preferences parsed from the loosely-typed source blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct StudyPreferences {
    pub study_style: Option<String>,
    pub group_size: Option<String>,
    pub availability: Vec<String>,
}

/// Canonical in-memory profile, read-only for the duration of one request.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    pub id: String,
    pub institution: String,
    pub program_name: String,
    pub year_of_study: Option<i32>,
    pub bio: String,
    pub preferences: StudyPreferences,
    pub enrolled_courses: Vec<CourseEnrollment>,
    pub total_study_hours: f64,
}

/// A profile row as the store hands it over: every field optional, numbers
/// possibly strings, preferences untyped. Only the normalizer consumes this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProfile {
    pub id: Option<String>,
    pub institution: Option<String>,
    pub program_name: Option<String>,
    pub year_of_study: Option<Value>,
    pub bio: Option<String>,
    pub preferences: Option<Value>,
    pub enrolled_courses: Option<Vec<RawEnrollment>>,
    pub total_study_hours: Option<Value>,
}

/// Enrollment entry as stored, prior to normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEnrollment {
    pub course_id: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub topics: Option<Vec<RawTopic>>,
}

/// Topic entry as stored, prior to normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTopic {
    pub name: Option<String>,
}

/// Normalize a raw store record into a canonical profile.
///
/// Never fails. Missing text fields become empty strings, unparseable
/// numbers become absent signals, and a malformed preferences payload
/// degrades to the empty default rather than aborting the request.
pub fn normalize_profile(raw: RawProfile) -> UserProfile {
    let id = clean_text(raw.id);
    let preferences = parse_preferences(&id, raw.preferences.as_ref());

    let enrolled_courses = raw
        .enrolled_courses
        .unwrap_or_default()
        .into_iter()
        .filter_map(normalize_enrollment)
        .collect();

    UserProfile {
        id,
        institution: clean_text(raw.institution),
        program_name: clean_text(raw.program_name),
        year_of_study: coerce_year(raw.year_of_study.as_ref()),
        bio: clean_text(raw.bio),
        preferences,
        enrolled_courses,
        total_study_hours: coerce_hours(raw.total_study_hours.as_ref()),
    }
}

fn clean_text(value: Option<String>) -> String {
    value.map(|s| s.trim().to_owned()).unwrap_or_default()
}

/// Normalize one enrollment entry. Entries with neither a course id nor a
/// name carry no usable identity and are dropped.
fn normalize_enrollment(raw: RawEnrollment) -> Option<CourseEnrollment> {
    let course_id = clean_text(raw.course_id);
    let name = clean_text(raw.name);
    if course_id.is_empty() && name.is_empty() {
        return None;
    }

    let description = raw
        .description
        .map(|d| d.trim().to_owned())
        .filter(|d| !d.is_empty());

    let status = match raw.status.as_deref().map(str::trim) {
        Some(s) if s.eq_ignore_ascii_case("inactive") => EnrollmentStatus::Inactive,
        _ => EnrollmentStatus::Active,
    };

    let topics = raw
        .topics
        .unwrap_or_default()
        .into_iter()
        .filter_map(|topic| {
            let topic_name = clean_text(topic.name);
            (!topic_name.is_empty()).then(|| Topic {
                name: topic_name,
                course_id: course_id.clone(),
            })
        })
        .collect();

    Some(CourseEnrollment {
        course_id,
        code: clean_text(raw.code),
        name,
        description,
        status,
        topics,
    })
}

/// Parse the preferences blob, tolerating an object, a JSON-encoded string
/// containing an object, or garbage. Garbage yields the empty default.
fn parse_preferences(profile_id: &str, value: Option<&Value>) -> StudyPreferences {
    let Some(value) = value else {
        return StudyPreferences::default();
    };

    // Some writers store the preferences object pre-serialized as a string.
    let parsed = match value {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(inner) => inner,
            Err(err) => {
                debug!(profile_id, %err, "preferences string is not JSON, using defaults");
                return StudyPreferences::default();
            }
        },
        other => other.clone(),
    };

    match serde_path_to_error::deserialize::<_, StudyPreferences>(parsed) {
        Ok(preferences) => preferences,
        Err(err) => {
            debug!(
                profile_id,
                path = %err.path(),
                error = %err.inner(),
                "malformed preferences payload, using defaults"
            );
            StudyPreferences::default()
        }
    }
}

/// Coerce a year-of-study value out of whatever the store recorded.
/// Integers, integral floats, and numeric strings all work; anything else
/// is treated as no signal.
fn coerce_year(value: Option<&Value>) -> Option<i32> {
    match value? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .and_then(|f| (f >= i32::MIN as f64 && f <= i32::MAX as f64).then_some(f as i32))
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_hours(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
