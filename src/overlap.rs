//! Tiered course overlap detection and topic overlap counting.
//!
//! Two users rarely share literal course ids: partner institutions import
//! the same course under different ids, codes drift between catalog years,
//! and names get re-typed by hand. The matcher therefore walks a ladder of
//! increasingly fuzzy rules per course pair and stops at the first hit.

use std::collections::HashSet;

use crate::profile::CourseEnrollment;

/// Which rule of the tiered matching policy considered two courses shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Same stored course id.
    CourseId,
    /// One course name contains the other, case-insensitively.
    NameContainment,
    /// A word of one name (longer than two characters) appears in the other.
    NameToken,
    /// The first three characters of both module codes agree.
    CodePrefix,
    /// The leading 50 characters of one description appear in the other.
    DescriptionOverlap,
}

/// Shared courses for one user pair.
///
/// `shared` holds the current user's matched courses in discovery order,
/// deduplicated by course identity; `counterparts` holds the candidate-side
/// courses that participated in a match, for topic counting.
#[derive(Debug, Default)]
pub struct CourseOverlap<'a> {
    pub shared: Vec<&'a CourseEnrollment>,
    pub counterparts: Vec<&'a CourseEnrollment>,
}

impl CourseOverlap<'_> {
    /// Identity keys of the shared courses.
    pub fn shared_ids(&self) -> HashSet<String> {
        self.shared.iter().map(|c| identity_key(c)).collect()
    }

    /// Display names of the shared courses, in discovery order. Never
    /// truncated; only the scoring contribution is capped.
    pub fn shared_names(&self) -> Vec<String> {
        self.shared.iter().map(|c| c.name.clone()).collect()
    }
}

/// Decide whether a single course pair counts as shared, trying each tier
/// in order. The first tier that holds wins.
pub fn courses_match(a: &CourseEnrollment, b: &CourseEnrollment) -> Option<MatchTier> {
    if !a.course_id.is_empty() && a.course_id == b.course_id {
        return Some(MatchTier::CourseId);
    }

    let a_name = a.name.to_lowercase();
    let b_name = b.name.to_lowercase();

    if !a_name.is_empty()
        && !b_name.is_empty()
        && (a_name.contains(&b_name) || b_name.contains(&a_name))
    {
        return Some(MatchTier::NameContainment);
    }

    if token_appears_in(&a_name, &b_name) || token_appears_in(&b_name, &a_name) {
        return Some(MatchTier::NameToken);
    }

    if code_prefixes_match(&a.code, &b.code) {
        return Some(MatchTier::CodePrefix);
    }

    if descriptions_overlap(a.description.as_deref(), b.description.as_deref()) {
        return Some(MatchTier::DescriptionOverlap);
    }

    None
}

/// Collect the current user's courses that match at least one candidate
/// course. Each course counts once, even when several rules or several
/// candidate courses would match it.
pub fn find_shared_courses<'a>(
    current: &'a [CourseEnrollment],
    candidate: &'a [CourseEnrollment],
) -> CourseOverlap<'a> {
    let mut overlap = CourseOverlap::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut seen_counterparts: HashSet<String> = HashSet::new();

    for course in current {
        let key = identity_key(course);
        if seen.contains(&key) {
            continue;
        }

        let hit = candidate
            .iter()
            .find_map(|other| courses_match(course, other).map(|tier| (tier, other)));

        if let Some((_tier, counterpart)) = hit {
            seen.insert(key);
            overlap.shared.push(course);

            let counterpart_key = identity_key(counterpart);
            if seen_counterparts.insert(counterpart_key) {
                overlap.counterparts.push(counterpart);
            }
        }
    }

    overlap
}

/// Count distinct topic names from the current user's matched courses that
/// match a candidate topic by case-insensitive equality or containment in
/// either direction. A single integer signal; never shown as a list.
pub fn count_shared_topics(overlap: &CourseOverlap<'_>) -> usize {
    let candidate_topics: Vec<String> = overlap
        .counterparts
        .iter()
        .flat_map(|course| course.topics.iter())
        .map(|topic| topic.name.to_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    if candidate_topics.is_empty() {
        return 0;
    }

    let mut counted: HashSet<String> = HashSet::new();
    for topic in overlap.shared.iter().flat_map(|course| course.topics.iter()) {
        let name = topic.name.to_lowercase();
        if name.is_empty() || counted.contains(&name) {
            continue;
        }
        let matched = candidate_topics
            .iter()
            .any(|other| other.contains(&name) || name.contains(other.as_str()));
        if matched {
            counted.insert(name);
        }
    }

    counted.len()
}

/// Courses with no stored id fall back to the lower-cased name as identity.
fn identity_key(course: &CourseEnrollment) -> String {
    if course.course_id.is_empty() {
        course.name.to_lowercase()
    } else {
        course.course_id.clone()
    }
}

/// Any whitespace-delimited token longer than two characters from `from`
/// appearing as a substring of `to`.
fn token_appears_in(from: &str, to: &str) -> bool {
    if to.is_empty() {
        return false;
    }
    from.split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .any(|token| to.contains(token))
}

fn code_prefix(code: &str) -> Option<String> {
    let prefix: String = code.chars().take(3).collect();
    (prefix.chars().count() == 3).then(|| prefix.to_lowercase())
}

fn code_prefixes_match(a: &str, b: &str) -> bool {
    matches!((code_prefix(a), code_prefix(b)), (Some(x), Some(y)) if x == y)
}

/// Both descriptions present and longer than 20 characters, and the first
/// 50 characters of one appearing inside the other, case-insensitively.
fn descriptions_overlap(a: Option<&str>, b: Option<&str>) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };
    if a.chars().count() <= 20 || b.chars().count() <= 20 {
        return false;
    }

    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let a_head: String = a.chars().take(50).collect();
    let b_head: String = b.chars().take(50).collect();

    b.contains(&a_head) || a.contains(&b_head)
}
