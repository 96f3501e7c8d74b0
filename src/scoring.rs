//! Compatibility scoring: tokenizer, Jaccard similarity, weighted factors.
//!
//! The score is deliberately transparent: four fixed-weight factors, each
//! explained by a breakdown line when it contributes. Clients render the
//! breakdown verbatim, so wording changes here are user-visible.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use ts_rs::TS;

use crate::overlap;
use crate::profile::UserProfile;

/// Points per shared course.
const SHARED_COURSE_POINTS: u32 = 15;

/// Shared courses beyond this stop earning points. The display list stays
/// uncapped; only the contribution is bounded, so stacking enrollments
/// cannot dominate the score.
const SHARED_COURSE_CAP: usize = 4;

/// Maximum points from program-name similarity.
const PROGRAM_SIMILARITY_POINTS: f64 = 30.0;

/// Points when both users name the same institution.
const SAME_INSTITUTION_POINTS: u32 = 3;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("static pattern"));
static TOKEN_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(ing|ers|er|s)$").expect("static pattern"));

/// Score and explanation for a single candidate.
///
/// Produced identically for ranked search and the existing-connections
/// listing, so a partner shows the same number in both places.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScoreResult {
    /// Composite compatibility score in `[0, 100]`.
    pub score: u32,
    /// One line per contributing factor, in fixed factor order.
    pub breakdown: Vec<String>,
    /// Display names of every shared course, never truncated.
    pub shared_courses: Vec<String>,
    /// Distinct overlapping topic names within the shared courses.
    pub shared_topics_count: usize,
}

/// Tokenize free text for set-similarity comparison.
///
/// Lower-cases, replaces everything outside `[a-z0-9\s]` with a space,
/// splits on whitespace, and strips one trailing `ing`/`ers`/`er`/`s`
/// per token. The suffix stripping is lossy on purpose ("engineering" and
/// "engineers" reduce to different stems); it is part of the observed
/// scoring semantics, not a stand-in for a real stemmer.
pub fn tokenize(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_ALPHANUMERIC.replace_all(&lowered, " ");
    cleaned
        .split_whitespace()
        .map(|token| TOKEN_SUFFIX.replace(token, "").into_owned())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Jaccard similarity of two token sets: `|intersection| / |union|`.
///
/// The union is treated as 1 when both sets are empty, so two absent
/// program names score 0 instead of dividing by zero.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count().max(1);
    intersection as f64 / union as f64
}

fn year_proximity_points(current: Option<i32>, candidate: Option<i32>) -> u32 {
    let (Some(a), Some(b)) = (current, candidate) else {
        return 0;
    };
    match (i64::from(a) - i64::from(b)).abs() {
        0 => 7,
        1 => 4,
        2 => 2,
        _ => 0,
    }
}

fn same_institution(a: &str, b: &str) -> bool {
    !a.is_empty() && a == b
}

/// Compute the compatibility score between the current user and one
/// candidate, with a human-readable breakdown of contributing factors.
///
/// Missing fields contribute nothing rather than erroring; a pair with no
/// overlapping signal at all scores 0 with an empty breakdown (the caller
/// layer supplies any fallback wording).
pub fn compute_score(current: &UserProfile, candidate: &UserProfile) -> ScoreResult {
    let course_overlap =
        overlap::find_shared_courses(&current.enrolled_courses, &candidate.enrolled_courses);
    let shared_topics_count = overlap::count_shared_topics(&course_overlap);
    let shared_courses = course_overlap.shared_names();

    let mut score: u32 = 0;
    let mut breakdown: Vec<String> = Vec::new();

    let scored_courses = shared_courses.len().min(SHARED_COURSE_CAP);
    if scored_courses > 0 {
        let points = scored_courses as u32 * SHARED_COURSE_POINTS;
        score += points;
        breakdown.push(format!("Shared courses ×{scored_courses}: +{points}"));
    }

    let similarity = jaccard(
        &tokenize(&current.program_name),
        &tokenize(&candidate.program_name),
    );
    let program_points = (similarity * PROGRAM_SIMILARITY_POINTS).round() as u32;
    if program_points > 0 {
        score += program_points;
        breakdown.push(format!("Program similarity: +{program_points}"));
    }

    let year_points = year_proximity_points(current.year_of_study, candidate.year_of_study);
    if year_points > 0 {
        score += year_points;
        breakdown.push(format!("Year proximity: +{year_points}"));
    }

    if same_institution(&current.institution, &candidate.institution) {
        score += SAME_INSTITUTION_POINTS;
        breakdown.push(format!("Same institution: +{SAME_INSTITUTION_POINTS}"));
    }

    ScoreResult {
        score: score.min(100),
        breakdown,
        shared_courses,
        shared_topics_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CourseEnrollment, EnrollmentStatus, StudyPreferences};

    fn tokens(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| (*w).to_owned()).collect()
    }

    fn profile(id: &str) -> UserProfile {
        UserProfile {
            id: id.to_owned(),
            institution: String::new(),
            program_name: String::new(),
            year_of_study: None,
            bio: String::new(),
            preferences: StudyPreferences::default(),
            enrolled_courses: Vec::new(),
            total_study_hours: 0.0,
        }
    }

    fn course(id: &str, name: &str) -> CourseEnrollment {
        CourseEnrollment {
            course_id: id.to_owned(),
            code: String::new(),
            name: name.to_owned(),
            description: None,
            status: EnrollmentStatus::Active,
            topics: Vec::new(),
        }
    }

    fn with_courses(mut p: UserProfile, count: usize) -> UserProfile {
        p.enrolled_courses = (0..count)
            .map(|i| course(&format!("c{i}"), &format!("Course {i}")))
            .collect();
        p
    }

    #[test]
    fn tokenize_strips_punctuation_and_suffixes() {
        assert_eq!(
            tokenize("Computer Science"),
            tokens(&["comput", "science"])
        );
        assert_eq!(tokenize("C++ & Rust!"), tokens(&["c", "rust"]));
        assert_eq!(tokenize("Mathematics"), tokens(&["mathematic"]));
    }

    #[test]
    fn tokenize_suffix_order_is_first_match() {
        // "ing" is tried before "ers"/"er"/"s", so related words land on
        // different stems. Recorded behavior, kept as-is.
        assert_eq!(tokenize("Engineering"), tokens(&["engineer"]));
        assert_eq!(tokenize("Engineers"), tokens(&["engine"]));
        assert_eq!(tokenize("readers"), tokens(&["read"]));
    }

    #[test]
    fn tokenize_drops_tokens_that_strip_to_nothing() {
        assert!(tokenize("s ing ers").is_empty());
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \t ").is_empty());
    }

    #[test]
    fn jaccard_identical_sets_is_one() {
        let set = tokens(&["comput", "science"]);
        assert_eq!(jaccard(&set, &set), 1.0);
    }

    #[test]
    fn jaccard_disjoint_sets_is_zero() {
        assert_eq!(jaccard(&tokens(&["a"]), &tokens(&["b"])), 0.0);
    }

    #[test]
    fn jaccard_both_empty_is_zero() {
        assert_eq!(jaccard(&HashSet::new(), &HashSet::new()), 0.0);
    }

    #[test]
    fn jaccard_partial_overlap() {
        let a = tokens(&["data", "science"]);
        let b = tokens(&["data", "engineer"]);
        // 1 shared of 3 distinct.
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn shared_course_contribution_is_capped() {
        let expectations = [(0, 0), (1, 15), (2, 30), (3, 45), (4, 60), (6, 60)];
        for (count, expected) in expectations {
            let current = with_courses(profile("a"), count);
            let candidate = with_courses(profile("b"), count);
            let result = compute_score(&current, &candidate);
            assert_eq!(result.score, expected, "course count {count}");
            assert_eq!(result.shared_courses.len(), count);
        }
    }

    #[test]
    fn six_shared_courses_keep_full_display_list() {
        let current = with_courses(profile("a"), 6);
        let candidate = with_courses(profile("b"), 6);
        let result = compute_score(&current, &candidate);
        assert_eq!(result.shared_courses.len(), 6);
        assert_eq!(result.score, 60);
        assert_eq!(result.breakdown, vec!["Shared courses ×4: +60".to_owned()]);
    }

    #[test]
    fn identical_programs_earn_full_similarity_points() {
        let mut current = profile("a");
        let mut candidate = profile("b");
        current.program_name = "Computer Science".into();
        candidate.program_name = "Computer Science".into();

        let result = compute_score(&current, &candidate);
        assert_eq!(result.score, 30);
        assert_eq!(result.breakdown, vec!["Program similarity: +30".to_owned()]);
    }

    #[test]
    fn program_similarity_points_are_rounded() {
        let mut current = profile("a");
        let mut candidate = profile("b");
        // Tokens {data, science} vs {data, engineer}: 1/3 of 30 rounds to 10.
        current.program_name = "Data Science".into();
        candidate.program_name = "Data Engineering".into();

        let result = compute_score(&current, &candidate);
        assert_eq!(result.score, 10);
    }

    #[test]
    fn year_proximity_tiers() {
        let expectations = [(0, 7), (1, 4), (2, 2), (3, 0), (10, 0)];
        for (diff, expected) in expectations {
            let mut current = profile("a");
            let mut candidate = profile("b");
            current.year_of_study = Some(3);
            candidate.year_of_study = Some(3 + diff);
            let result = compute_score(&current, &candidate);
            assert_eq!(result.score, expected, "year diff {diff}");
        }
    }

    #[test]
    fn missing_year_contributes_nothing() {
        let mut current = profile("a");
        current.year_of_study = Some(2);
        let result = compute_score(&current, &profile("b"));
        assert_eq!(result.score, 0);
        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn same_institution_requires_non_empty() {
        let mut current = profile("a");
        let mut candidate = profile("b");
        // Both empty: no points.
        assert_eq!(compute_score(&current, &candidate).score, 0);

        current.institution = "State University".into();
        candidate.institution = "State University".into();
        let result = compute_score(&current, &candidate);
        assert_eq!(result.score, 3);
        assert_eq!(result.breakdown, vec!["Same institution: +3".to_owned()]);
    }

    #[test]
    fn perfect_match_scores_exactly_one_hundred() {
        let mut current = with_courses(profile("a"), 4);
        let mut candidate = with_courses(profile("b"), 4);
        current.institution = "State University".into();
        candidate.institution = "State University".into();
        current.program_name = "Software Engineering".into();
        candidate.program_name = "Software Engineering".into();
        current.year_of_study = Some(2);
        candidate.year_of_study = Some(2);

        let result = compute_score(&current, &candidate);
        assert_eq!(result.score, 100);
        assert_eq!(result.breakdown, vec![
            "Shared courses ×4: +60".to_owned(),
            "Program similarity: +30".to_owned(),
            "Year proximity: +7".to_owned(),
            "Same institution: +3".to_owned(),
        ]);
    }

    #[test]
    fn no_signal_scores_zero_with_empty_breakdown() {
        let result = compute_score(&profile("a"), &profile("b"));
        assert_eq!(result.score, 0);
        assert!(result.breakdown.is_empty());
        assert!(result.shared_courses.is_empty());
        assert_eq!(result.shared_topics_count, 0);
    }

    #[test]
    fn breakdown_only_lists_contributing_factors() {
        let mut current = profile("a");
        let mut candidate = profile("b");
        current.year_of_study = Some(1);
        candidate.year_of_study = Some(2);

        let result = compute_score(&current, &candidate);
        assert_eq!(result.score, 4);
        assert_eq!(result.breakdown, vec!["Year proximity: +4".to_owned()]);
    }
}
