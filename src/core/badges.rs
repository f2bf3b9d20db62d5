//! Streak badge derivation.
//!
//! Badges are never persisted; they are recomputed from the current streak
//! whenever they are displayed.

/// Badge thresholds in ascending order, with display labels.
pub const BADGES: &[(u32, &str)] = &[
    (7, "Bronze Streak (7 days)"),
    (30, "Silver Streak (30 days)"),
    (100, "Gold Streak (100 days)"),
];

/// All badges earned by a streak, thresholds inclusive, ascending.
pub fn badges_for(streak: u32) -> Vec<&'static str> {
    BADGES
        .iter()
        .filter(|(threshold, _)| streak >= *threshold)
        .map(|(_, label)| *label)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_badges_below_bronze() {
        assert!(badges_for(0).is_empty());
        assert!(badges_for(6).is_empty());
    }

    #[test]
    fn test_bronze_at_seven() {
        assert_eq!(badges_for(7), vec!["Bronze Streak (7 days)"]);
    }

    #[test]
    fn test_silver_includes_bronze() {
        assert_eq!(
            badges_for(30),
            vec!["Bronze Streak (7 days)", "Silver Streak (30 days)"]
        );
    }

    #[test]
    fn test_gold_includes_all() {
        assert_eq!(
            badges_for(100),
            vec![
                "Bronze Streak (7 days)",
                "Silver Streak (30 days)",
                "Gold Streak (100 days)"
            ]
        );
        assert_eq!(badges_for(365), badges_for(100));
    }

    #[test]
    fn test_between_thresholds() {
        assert_eq!(badges_for(29), vec!["Bronze Streak (7 days)"]);
        assert_eq!(badges_for(99).len(), 2);
    }

    #[test]
    fn test_thresholds_are_ascending() {
        let thresholds: Vec<u32> = BADGES.iter().map(|(t, _)| *t).collect();
        let mut sorted = thresholds.clone();
        sorted.sort_unstable();
        assert_eq!(thresholds, sorted);
    }
}
