//! Dense shot-ordering math.
//!
//! Within a scene, live (non-deleted) shots occupy the contiguous
//! sequence range `0..N-1`. The functions here compute the batch of
//! sequence assignments an operation requires; applying a batch
//! atomically is the store's responsibility.

use crate::error::CoreError;
use crate::naming::shot_display_name;
use crate::types::EntityId;

/// One shot's new position (and optionally new display name) within a
/// batch update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceAssignment {
    pub shot_id: EntityId,
    pub sequence: u32,
    /// New display name, when the operation also renames.
    pub name: Option<String>,
}

/// Position for a shot appended at the end of a scene.
pub fn append_position(live_count: usize) -> u32 {
    live_count as u32
}

/// Check that an insertion position lies within `0..=N`.
pub fn validate_insert_position(live_count: usize, position: u32) -> Result<(), CoreError> {
    if position as usize > live_count {
        return Err(CoreError::Validation(format!(
            "Insert position {position} out of range for {live_count} shots"
        )));
    }
    Ok(())
}

/// Assignments that shift every shot at or after `position` up by one,
/// making room for an insertion. Shots before `position` are untouched.
pub fn insert_shift_plan(live: &[(EntityId, u32)], position: u32) -> Vec<SequenceAssignment> {
    live.iter()
        .filter(|(_, seq)| *seq >= position)
        .map(|(id, seq)| SequenceAssignment {
            shot_id: *id,
            sequence: seq + 1,
            name: None,
        })
        .collect()
}

/// Check that a proposed ordering is a full permutation of the current
/// live shots: same ids, no omissions, no duplicates.
pub fn validate_reorder(current: &[EntityId], proposed: &[EntityId]) -> Result<(), CoreError> {
    if current.len() != proposed.len() {
        return Err(CoreError::Validation(format!(
            "Reorder must cover all {} shots, got {}",
            current.len(),
            proposed.len()
        )));
    }
    let mut current_sorted: Vec<_> = current.to_vec();
    let mut proposed_sorted: Vec<_> = proposed.to_vec();
    current_sorted.sort();
    proposed_sorted.sort();
    if current_sorted != proposed_sorted {
        return Err(CoreError::Validation(
            "Reorder must be a permutation of the scene's live shots".to_string(),
        ));
    }
    Ok(())
}

/// Assignments giving each shot its index in the proposed ordering.
pub fn reorder_plan(ordered_ids: &[EntityId]) -> Vec<SequenceAssignment> {
    ordered_ids
        .iter()
        .enumerate()
        .map(|(index, id)| SequenceAssignment {
            shot_id: *id,
            sequence: index as u32,
            name: None,
        })
        .collect()
}

/// Assignments that compact sequences to `0..N-1` *and* regenerate every
/// display name from the new position. Order-dependent: `ordered_ids`
/// must already be in final display order.
pub fn renumber_plan(ordered_ids: &[EntityId]) -> Vec<SequenceAssignment> {
    ordered_ids
        .iter()
        .enumerate()
        .map(|(index, id)| SequenceAssignment {
            shot_id: *id,
            sequence: index as u32,
            name: Some(shot_display_name(index as u32)),
        })
        .collect()
}

/// Whether a set of sequence values is exactly `{0, 1, ..., N-1}`.
pub fn is_dense(sequences: &[u32]) -> bool {
    let mut sorted: Vec<_> = sequences.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(i, seq)| *seq == i as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<EntityId> {
        (0..n).map(|_| uuid::Uuid::new_v4()).collect()
    }

    #[test]
    fn append_goes_to_end() {
        assert_eq!(append_position(0), 0);
        assert_eq!(append_position(5), 5);
    }

    #[test]
    fn insert_position_bounds() {
        assert!(validate_insert_position(3, 0).is_ok());
        assert!(validate_insert_position(3, 3).is_ok());
        assert!(validate_insert_position(3, 4).is_err());
    }

    #[test]
    fn shift_plan_moves_tail_only() {
        let shots = ids(4);
        let live: Vec<_> = shots.iter().copied().zip(0u32..).collect();
        let plan = insert_shift_plan(&live, 2);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].shot_id, shots[2]);
        assert_eq!(plan[0].sequence, 3);
        assert_eq!(plan[1].shot_id, shots[3]);
        assert_eq!(plan[1].sequence, 4);
    }

    #[test]
    fn shift_plan_at_end_is_empty() {
        let shots = ids(2);
        let live: Vec<_> = shots.iter().copied().zip(0u32..).collect();
        assert!(insert_shift_plan(&live, 2).is_empty());
    }

    #[test]
    fn reorder_requires_permutation() {
        let shots = ids(3);
        let mut reversed = shots.clone();
        reversed.reverse();
        assert!(validate_reorder(&shots, &reversed).is_ok());

        assert!(validate_reorder(&shots, &shots[..2]).is_err());

        let mut with_stranger = shots.clone();
        with_stranger[1] = uuid::Uuid::new_v4();
        assert!(validate_reorder(&shots, &with_stranger).is_err());

        let duplicated = vec![shots[0], shots[0], shots[2]];
        assert!(validate_reorder(&shots, &duplicated).is_err());
    }

    #[test]
    fn reorder_plan_assigns_indices() {
        let shots = ids(3);
        let plan = reorder_plan(&shots);
        let seqs: Vec<_> = plan.iter().map(|a| a.sequence).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert!(plan.iter().all(|a| a.name.is_none()));
    }

    #[test]
    fn renumber_plan_names_follow_position() {
        let shots = ids(3);
        let plan = renumber_plan(&shots);
        assert_eq!(plan[0].name.as_deref(), Some("Shot_1"));
        assert_eq!(plan[2].name.as_deref(), Some("Shot_3"));
        assert!(is_dense(&plan.iter().map(|a| a.sequence).collect::<Vec<_>>()));
    }

    #[test]
    fn density_check() {
        assert!(is_dense(&[]));
        assert!(is_dense(&[0]));
        assert!(is_dense(&[2, 0, 1]));
        assert!(!is_dense(&[0, 2]));
        assert!(!is_dense(&[0, 1, 1]));
    }
}
