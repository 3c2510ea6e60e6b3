//! Points awarded per match.
//!
//! Each match earns a base of 100 plus two bonuses that shrink as the
//! attempt goes on: up to 50 for elapsed time and up to 100 for moves
//! spent. The sum is multiplied by the level number. Bonuses are measured
//! at the moment of the match, not at the end of the game.

/// Base points of a match.
pub const MATCH_BASE: u64 = 100;

/// Time bonus at zero seconds, losing one point per second.
pub const TIME_BONUS_BUDGET: u64 = 50;

/// Move bonus at zero moves, losing two points per move.
pub const MOVE_BONUS_BUDGET: u64 = 100;

/// Points for a match made after `time_elapsed_seconds` with `moves` moves
/// (counting the flip that completed the match) at `level`.
#[must_use]
pub fn match_score(time_elapsed_seconds: u32, moves: u32, level: u32) -> u64 {
    let time_bonus = TIME_BONUS_BUDGET.saturating_sub(u64::from(time_elapsed_seconds));
    let move_bonus = MOVE_BONUS_BUDGET.saturating_sub(u64::from(moves) * 2);
    (MATCH_BASE + time_bonus + move_bonus) * u64::from(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_first_match() {
        // Two moves at t=0 on level 1
        assert_eq!(match_score(0, 2, 1), 100 + 50 + 96);
    }

    #[test]
    fn test_bonuses_floor_at_zero() {
        assert_eq!(match_score(600, 400, 1), 100);
    }

    #[test]
    fn test_level_multiplier() {
        assert_eq!(match_score(10, 10, 3), (100 + 40 + 80) * 3);
    }

    #[test]
    fn test_always_positive() {
        assert!(match_score(u32::MAX, u32::MAX, 1) > 0);
    }
}
