//! Action Mask 構建
//!
//! 告訴呈現層目前哪些輸入合法，避免在錯誤階段送出決策。

use super::state::GameSession;
use crate::game::{Phase, ACTION_BANK, ACTION_CONTINUE, ACTION_COUNT, ACTION_ROLL};

/// 從遊戲狀態構建 action mask
pub fn action_mask_from_session(session: &GameSession) -> [bool; ACTION_COUNT] {
    let mut mask = [false; ACTION_COUNT];

    match session.phase() {
        Phase::AwaitRoll | Phase::TurnEnded => {
            mask[ACTION_ROLL] = true;
        }
        Phase::AwaitDecision => {
            mask[ACTION_CONTINUE] = true;
            mask[ACTION_BANK] = true;
        }
        Phase::GameWon => {}
    }

    mask
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Decision, DiceRoller};

    fn session() -> GameSession {
        GameSession::new(vec!["A".into(), "B".into()], DiceRoller::new(9)).unwrap()
    }

    #[test]
    fn test_roll_only_at_start() {
        let mask = action_mask_from_session(&session());
        assert_eq!(mask, [true, false, false]);
    }

    #[test]
    fn test_decision_after_qualifying_roll() {
        let mut s = session();
        s.roll_with(vec![1, 2, 3, 4, 6]).unwrap();
        assert_eq!(action_mask_from_session(&s), [false, true, true]);

        s.submit_decision(Decision::Continue).unwrap();
        assert_eq!(action_mask_from_session(&s), [true, false, false]);
    }

    #[test]
    fn test_nothing_after_win() {
        let mut s = session();
        s.record_bank(0, 995).unwrap();
        s.roll_with(vec![5, 2, 3, 4, 6]).unwrap();
        s.submit_decision(Decision::Bank).unwrap();
        assert_eq!(s.phase(), Phase::GameWon);
        assert_eq!(action_mask_from_session(&s), [false; ACTION_COUNT]);
    }
}
