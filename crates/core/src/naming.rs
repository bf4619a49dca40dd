//! Derived display-name convention for shots.
//!
//! Shot names are not user-chosen: they are regenerated from the shot's
//! position whenever a scene is restructured, so `Shot_3` is always the
//! third live shot of its scene.

/// Display name for the shot at the given zero-based sequence position.
pub fn shot_display_name(sequence: u32) -> String {
    format!("Shot_{}", sequence + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_shot_is_one_based() {
        assert_eq!(shot_display_name(0), "Shot_1");
    }

    #[test]
    fn name_follows_position() {
        assert_eq!(shot_display_name(4), "Shot_5");
        assert_eq!(shot_display_name(11), "Shot_12");
    }
}
