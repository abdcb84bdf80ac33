//! crates/collab_core/src/matching.rs
//!
//! The skill match engine: ranks candidate users or projects against a
//! reference user's skill set. Pure functions over roster snapshots; the
//! results are recomputed on every request and never persisted.

use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::{Project, User};

/// Collaborator results are capped at the ten best candidates.
pub const MAX_COLLABORATOR_MATCHES: usize = 10;

/// A ranked collaborator recommendation.
#[derive(Debug, Clone)]
pub struct CollaboratorMatch {
    pub user: User,
    /// Jaccard similarity of the two skill sets, as a rounded percentage.
    pub match_percentage: u8,
    /// The candidate's skills that the reference user shares, in the
    /// candidate's own order.
    pub matching_skills: Vec<String>,
}

/// A ranked project recommendation.
#[derive(Debug, Clone)]
pub struct ProjectMatch {
    pub project: Project,
    /// Fraction of the project's required skills the user covers, as a
    /// rounded percentage.
    pub match_percentage: u8,
}

/// `round(100 * num / den)`, defined as 0 when the denominator is 0.
fn ratio_percentage(num: usize, den: usize) -> u8 {
    if den == 0 {
        return 0;
    }
    ((num as f64 / den as f64) * 100.0).round() as u8
}

/// Ranks every other user in `roster` against `reference` by skill-set
/// Jaccard similarity.
///
/// The reference user is excluded, as is every candidate with no skill in
/// common. Ties keep the roster order (the sort is stable) and the result
/// is truncated to [`MAX_COLLABORATOR_MATCHES`].
pub fn match_collaborators(reference: &User, roster: &[User]) -> Vec<CollaboratorMatch> {
    let reference_skills: HashSet<&str> =
        reference.skills.iter().map(String::as_str).collect();

    let mut matches: Vec<CollaboratorMatch> = roster
        .iter()
        .filter(|candidate| candidate.id != reference.id)
        .map(|candidate| {
            // Skill lists are sets; tolerate duplicate tags in stored data
            // so the intersection count can never exceed the union count.
            let mut seen = HashSet::new();
            let matching_skills: Vec<String> = candidate
                .skills
                .iter()
                .filter(|skill| reference_skills.contains(skill.as_str()))
                .filter(|skill| seen.insert(skill.as_str()))
                .cloned()
                .collect();

            let union_size = candidate
                .skills
                .iter()
                .map(String::as_str)
                .chain(reference_skills.iter().copied())
                .collect::<HashSet<&str>>()
                .len();

            CollaboratorMatch {
                user: candidate.clone(),
                match_percentage: ratio_percentage(matching_skills.len(), union_size),
                matching_skills,
            }
        })
        .filter(|m| m.match_percentage > 0)
        .collect();

    matches.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));
    matches.truncate(MAX_COLLABORATOR_MATCHES);
    matches
}

/// Ranks the projects the user could still join by how much of each
/// project's required skill set the user covers.
///
/// Projects the user created or already belongs to are excluded. Unlike
/// collaborator matching, zero-percent results stay in the list, and a
/// project with no required skills scores 0 rather than dividing by zero.
pub fn match_projects(reference: &User, projects: &[Project]) -> Vec<ProjectMatch> {
    let reference_skills: HashSet<&str> =
        reference.skills.iter().map(String::as_str).collect();

    let mut matches: Vec<ProjectMatch> = projects
        .iter()
        .filter(|p| p.created_by != reference.id && !p.is_member(reference.id))
        .map(|p| {
            let covered = p
                .required_skills
                .iter()
                .filter(|skill| reference_skills.contains(skill.as_str()))
                .count();

            ProjectMatch {
                project: p.clone(),
                match_percentage: ratio_percentage(covered, p.required_skills.len()),
            }
        })
        .collect();

    matches.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn user(skills: &[&str]) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: format!("{}@example.edu", Uuid::new_v4()),
            college: "Test College".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            bio: String::new(),
            created_at: Utc::now(),
        }
    }

    fn project(creator: Uuid, required: &[&str]) -> Project {
        Project::new(
            "Test Project",
            "A project for testing",
            required.iter().map(|s| s.to_string()).collect(),
            NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            3,
            creator,
        )
        .unwrap()
    }

    #[test]
    fn jaccard_percentage_matches_worked_example() {
        // [Go, Rust] vs [Rust, Python]: intersection 1, union 3 -> 33%.
        let a = user(&["Go", "Rust"]);
        let b = user(&["Rust", "Python"]);

        let matches = match_collaborators(&a, &[b.clone()]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_percentage, 33);
        assert_eq!(matches[0].matching_skills, vec!["Rust".to_string()]);
    }

    #[test]
    fn jaccard_percentage_is_symmetric() {
        let a = user(&["Go", "Rust", "SQL"]);
        let b = user(&["Rust", "Python"]);

        let ab = match_collaborators(&a, &[b.clone()]);
        let ba = match_collaborators(&b, &[a.clone()]);
        assert_eq!(ab[0].match_percentage, ba[0].match_percentage);
    }

    #[test]
    fn reference_user_is_excluded_from_results() {
        let a = user(&["Rust"]);
        let roster = vec![a.clone(), user(&["Rust"])];

        let matches = match_collaborators(&a, &roster);
        assert_eq!(matches.len(), 1);
        assert_ne!(matches[0].user.id, a.id);
    }

    #[test]
    fn disjoint_skill_sets_are_filtered_out() {
        let a = user(&["Rust", "Go"]);
        let b = user(&["Figma", "Marketing"]);

        assert!(match_collaborators(&a, &[b]).is_empty());
    }

    #[test]
    fn duplicate_skill_tags_do_not_inflate_the_percentage() {
        let a = user(&["Rust"]);
        let b = user(&["Rust", "Rust", "Rust"]);

        let matches = match_collaborators(&a, &[b]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_percentage, 100);
        assert_eq!(matches[0].matching_skills, vec!["Rust".to_string()]);
    }

    #[test]
    fn empty_skill_sets_never_divide_by_zero() {
        let a = user(&[]);
        let b = user(&[]);

        // Union is empty, so the guard yields 0 and the pair is filtered.
        assert!(match_collaborators(&a, &[b]).is_empty());
    }

    #[test]
    fn results_are_sorted_descending_and_capped_at_ten() {
        let a = user(&["Rust", "Go", "SQL"]);
        let mut roster = Vec::new();
        // One perfect match and a dozen weaker ones.
        roster.push(user(&["Rust", "Go", "SQL"]));
        for _ in 0..12 {
            roster.push(user(&["Rust", "Python", "Java", "C++"]));
        }

        let matches = match_collaborators(&a, &roster);
        assert_eq!(matches.len(), MAX_COLLABORATOR_MATCHES);
        assert_eq!(matches[0].match_percentage, 100);
        for pair in matches.windows(2) {
            assert!(pair[0].match_percentage >= pair[1].match_percentage);
        }
    }

    #[test]
    fn ties_preserve_roster_order() {
        let a = user(&["Rust"]);
        let b = user(&["Rust", "Go"]);
        let c = user(&["Rust", "Python"]);

        let matches = match_collaborators(&a, &[b.clone(), c.clone()]);
        assert_eq!(matches[0].user.id, b.id);
        assert_eq!(matches[1].user.id, c.id);
    }

    #[test]
    fn project_coverage_matches_worked_example() {
        let a = user(&["Go", "Rust"]);
        let p = project(Uuid::new_v4(), &["Go", "Rust", "SQL"]);

        let matches = match_projects(&a, &[p]);
        assert_eq!(matches[0].match_percentage, 67);
    }

    #[test]
    fn full_coverage_scores_one_hundred() {
        let a = user(&["Go", "Rust", "SQL", "Python"]);
        let p = project(Uuid::new_v4(), &["Go", "Rust"]);

        assert_eq!(match_projects(&a, &[p])[0].match_percentage, 100);
    }

    #[test]
    fn zero_coverage_projects_are_still_listed() {
        let a = user(&["Figma"]);
        let p = project(Uuid::new_v4(), &["Rust"]);

        let matches = match_projects(&a, &[p]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_percentage, 0);
    }

    #[test]
    fn project_without_required_skills_scores_zero() {
        let a = user(&["Rust"]);
        // Bypass the constructor so the empty-denominator guard is exercised.
        let mut p = project(Uuid::new_v4(), &["Rust"]);
        p.required_skills.clear();

        let matches = match_projects(&a, &[p]);
        assert_eq!(matches[0].match_percentage, 0);
    }

    #[test]
    fn own_and_joined_projects_are_excluded() {
        let a = user(&["Rust"]);
        let own = project(a.id, &["Rust"]);
        let mut joined = project(Uuid::new_v4(), &["Rust"]);
        joined.members.push(a.id);
        let open = project(Uuid::new_v4(), &["Rust"]);

        let matches = match_projects(&a, &[own, joined, open.clone()]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].project.id, open.id);
    }
}
