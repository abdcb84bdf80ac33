//! crates/collab_core/src/membership.rs
//!
//! Join semantics and capacity bookkeeping for project teams.

use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, Project};

/// Adds `user_id` to the project's member list.
///
/// Fails with [`DomainError::AlreadyMember`] if the user is already on the
/// team (the creator counts as a member from creation). Capacity is not a
/// guard: a full project can still be joined and its open-slot count simply
/// stays at zero.
pub fn join(project: &mut Project, user_id: Uuid) -> DomainResult<()> {
    if project.is_member(user_id) {
        return Err(DomainError::AlreadyMember);
    }
    project.members.push(user_id);
    Ok(())
}

/// Remaining unfilled capacity: the target team size minus the current
/// member count, saturating at zero when a team has grown past its target.
pub fn open_slots(project: &Project) -> u32 {
    project
        .target_team_size
        .saturating_sub(project.members.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn project(target_team_size: u32) -> (Project, Uuid) {
        let creator = Uuid::new_v4();
        let project = Project::new(
            "Capstone",
            "Semester-long capstone project",
            vec!["Rust".to_string()],
            NaiveDate::from_ymd_opt(2027, 5, 1).unwrap(),
            target_team_size,
            creator,
        )
        .unwrap();
        (project, creator)
    }

    #[test]
    fn creator_is_seeded_as_sole_member() {
        let (project, creator) = project(3);
        assert_eq!(project.members, vec![creator]);
        assert_eq!(open_slots(&project), 2);
    }

    #[test]
    fn join_appends_exactly_once() {
        let (mut project, _) = project(3);
        let joiner = Uuid::new_v4();

        join(&mut project, joiner).unwrap();
        assert_eq!(join(&mut project, joiner), Err(DomainError::AlreadyMember));
        assert_eq!(
            project.members.iter().filter(|m| **m == joiner).count(),
            1
        );
    }

    #[test]
    fn creator_cannot_rejoin() {
        let (mut project, creator) = project(3);
        assert_eq!(join(&mut project, creator), Err(DomainError::AlreadyMember));
    }

    #[test]
    fn open_slots_saturate_at_zero() {
        let (mut project, _) = project(2);
        join(&mut project, Uuid::new_v4()).unwrap();
        assert_eq!(open_slots(&project), 0);

        // Joining past capacity is allowed; the count stays pinned at zero.
        join(&mut project, Uuid::new_v4()).unwrap();
        assert_eq!(open_slots(&project), 0);
    }

    #[test]
    fn creation_rejects_bad_input() {
        let creator = Uuid::new_v4();
        let deadline = NaiveDate::from_ymd_opt(2027, 5, 1).unwrap();

        assert!(matches!(
            Project::new("  ", "desc", vec!["Rust".into()], deadline, 3, creator),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Project::new("Title", "desc", vec![], deadline, 3, creator),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Project::new("Title", "desc", vec!["Rust".into()], deadline, 0, creator),
            Err(DomainError::Validation(_))
        ));
    }
}
