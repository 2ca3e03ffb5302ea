//! 遊戲狀態管理
//!
//! `GameSession` 獨佔所有可變狀態（玩家、輪替索引、進行中的回合、亂數來源），
//! 外部只能透過這裡的操作推進遊戲。

use tracing::{debug, info};

use super::turn::{RollOutcome, TurnController};
use crate::game::{
    Decision, DiceRoller, GameError, Phase, Player, TurnEnd, TurnStage, MAX_PLAYERS, MIN_PLAYERS,
    WINNING_SCORE,
};

/// 上一個結束的回合
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnRecord {
    pub player_index: usize,
    pub end: TurnEnd,
}

/// 整局遊戲
pub struct GameSession {
    players: Vec<Player>,
    current_player_index: usize,
    turn: TurnController,
    roller: DiceRoller,
    phase: Phase,

    // 呈現用紀錄
    last_roll: Option<RollOutcome>,
    last_turn: Option<TurnRecord>,
    winner: Option<usize>,
}

/// 以玩家人數與名字建立遊戲
pub fn create_session(
    player_count: usize,
    names: Vec<String>,
    roller: DiceRoller,
) -> Result<GameSession, GameError> {
    if names.len() != player_count {
        return Err(GameError::NameCountMismatch {
            expected: player_count,
            got: names.len(),
        });
    }
    GameSession::new(names, roller)
}

impl GameSession {
    pub fn new(names: Vec<String>, roller: DiceRoller) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()) {
            return Err(GameError::InvalidPlayerCount(names.len()));
        }
        if let Some(index) = names.iter().position(|n| n.trim().is_empty()) {
            return Err(GameError::EmptyName { index });
        }

        let players: Vec<Player> = names.into_iter().map(Player::new).collect();
        info!(players = players.len(), first = %players[0].name, "session created");

        Ok(Self {
            players,
            current_player_index: 0,
            turn: TurnController::new(),
            roller,
            phase: Phase::AwaitRoll,
            last_roll: None,
            last_turn: None,
            winner: None,
        })
    }

    // =========================================================================
    // 查詢
    // =========================================================================

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    pub fn turn(&self) -> &TurnController {
        &self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_roll(&self) -> Option<&RollOutcome> {
        self.last_roll.as_ref()
    }

    pub fn last_turn(&self) -> Option<TurnRecord> {
        self.last_turn
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|idx| &self.players[idx])
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// 玩家是否已達勝利分數
    pub fn check_win(&self, player_index: usize) -> bool {
        self.players[player_index].total_score >= WINNING_SCORE
    }

    // =========================================================================
    // 輪替與存分
    // =========================================================================

    /// 跳過目前玩家：只在回合尚未累積分數、也還沒擲骰時允許
    pub fn advance_turn(&mut self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if self.turn.stage() != TurnStage::Idle || self.turn.current_score() != 0 {
            return Err(GameError::WrongStage {
                action: "advance turn",
                stage: self.turn.stage(),
            });
        }
        self.pass_turn();
        Ok(())
    }

    /// 將分數存入玩家總分
    pub fn record_bank(&mut self, player_index: usize, amount: u32) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        self.players[player_index].record_bank(amount);
        Ok(())
    }

    fn pass_turn(&mut self) {
        self.current_player_index = (self.current_player_index + 1) % self.players.len();
        self.turn = TurnController::new();
        debug!(next = %self.current_player().name, "turn advanced");
    }

    // =========================================================================
    // 回合推進
    // =========================================================================

    /// 以共用擲骰器擲骰並立即評估
    pub fn roll(&mut self) -> Result<RollOutcome, GameError> {
        self.begin_roll()?;
        self.turn.roll(&mut self.roller)?;
        self.resolve_roll()
    }

    /// 以給定骰面推進（重播或測試用）
    pub fn roll_with(&mut self, faces: Vec<u8>) -> Result<RollOutcome, GameError> {
        self.begin_roll()?;
        self.turn.place_roll(faces)?;
        self.resolve_roll()
    }

    /// 提交繼續／存分決策
    pub fn submit_decision(&mut self, decision: Decision) -> Result<Phase, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }

        let stage = self.turn.decide(decision)?;
        let idx = self.current_player_index;

        match stage {
            TurnStage::Idle => {
                self.phase = Phase::AwaitRoll;
            }
            TurnStage::Ended(TurnEnd::Banked { amount }) => {
                self.record_bank(idx, amount)?;
                self.last_turn = Some(TurnRecord {
                    player_index: idx,
                    end: TurnEnd::Banked { amount },
                });
                info!(
                    player = %self.players[idx].name,
                    banked = amount,
                    total = self.players[idx].total_score,
                    "turn banked"
                );

                if self.check_win(idx) {
                    self.winner = Some(idx);
                    self.phase = Phase::GameWon;
                    info!(
                        winner = %self.players[idx].name,
                        score = self.players[idx].total_score,
                        "game won"
                    );
                } else {
                    self.pass_turn();
                    self.phase = Phase::TurnEnded;
                }
            }
            other => unreachable!("decide returned unexpected stage {:?}", other),
        }

        Ok(self.phase)
    }

    // 只檢查；階段由 resolve_roll 在骰面被接受後才更新
    fn begin_roll(&self) -> Result<(), GameError> {
        match self.phase {
            Phase::GameWon => Err(GameError::GameOver),
            Phase::AwaitDecision => Err(GameError::WrongStage {
                action: "roll",
                stage: self.turn.stage(),
            }),
            Phase::AwaitRoll | Phase::TurnEnded => Ok(()),
        }
    }

    fn resolve_roll(&mut self) -> Result<RollOutcome, GameError> {
        let outcome = self.turn.evaluate()?;
        let idx = self.current_player_index;
        self.players[idx].current_score = self.turn.current_score();

        match outcome.stage {
            TurnStage::AwaitingDecision => {
                self.phase = Phase::AwaitDecision;
            }
            TurnStage::Ended(end @ TurnEnd::Bust { forfeited }) => {
                self.players[idx].bust();
                self.last_turn = Some(TurnRecord {
                    player_index: idx,
                    end,
                });
                info!(player = %self.players[idx].name, forfeited, "turn busted");
                self.pass_turn();
                self.phase = Phase::TurnEnded;
            }
            other => unreachable!("evaluate returned unexpected stage {:?}", other),
        }

        self.last_roll = Some(outcome.clone());
        Ok(outcome)
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("P{}", i)).collect()
    }

    fn session(n: usize) -> GameSession {
        GameSession::new(names(n), DiceRoller::new(42)).expect("valid player count")
    }

    #[test]
    fn test_create_session_validates_count() {
        assert_eq!(
            GameSession::new(names(1), DiceRoller::new(0)).err(),
            Some(GameError::InvalidPlayerCount(1))
        );
        assert_eq!(
            GameSession::new(names(9), DiceRoller::new(0)).err(),
            Some(GameError::InvalidPlayerCount(9))
        );
        assert!(GameSession::new(names(2), DiceRoller::new(0)).is_ok());
        assert!(GameSession::new(names(8), DiceRoller::new(0)).is_ok());
    }

    #[test]
    fn test_create_session_checks_names() {
        assert_eq!(
            create_session(3, names(2), DiceRoller::new(0)).err(),
            Some(GameError::NameCountMismatch { expected: 3, got: 2 })
        );
        let bad = vec!["A".to_string(), "  ".to_string()];
        assert_eq!(
            create_session(2, bad, DiceRoller::new(0)).err(),
            Some(GameError::EmptyName { index: 1 })
        );
    }

    #[test]
    fn test_initial_state() {
        let s = session(3);
        assert_eq!(s.current_player_index(), 0);
        assert_eq!(s.current_player().name, "P1");
        assert_eq!(s.phase(), Phase::AwaitRoll);
        assert!(s.winner().is_none());
    }

    #[test]
    fn test_advance_turn_wraps() {
        let mut s = session(3);
        s.advance_turn().unwrap();
        assert_eq!(s.current_player_index(), 1);
        s.advance_turn().unwrap();
        s.advance_turn().unwrap();
        assert_eq!(s.current_player_index(), 0);
    }

    #[test]
    fn test_check_win_threshold() {
        let mut s = session(2);
        s.record_bank(1, 999).unwrap();
        assert!(!s.check_win(1));
        s.record_bank(1, 1).unwrap();
        assert!(s.check_win(1));
    }

    #[test]
    fn test_qualifying_roll_mirrors_current_score() {
        let mut s = session(2);
        let outcome = s.roll_with(vec![1, 2, 3, 4, 6]).unwrap();
        assert_eq!(outcome.score.gained, 10);
        assert_eq!(s.phase(), Phase::AwaitDecision);
        assert_eq!(s.current_player().current_score, 10);
        assert!(s.turn().active_dice().is_empty());
        assert_eq!(s.turn().set_aside_dice().len(), 5);
    }

    #[test]
    fn test_roll_while_awaiting_decision_rejected() {
        let mut s = session(2);
        s.roll_with(vec![5, 2, 3, 4, 6]).unwrap();
        assert!(matches!(
            s.roll_with(vec![1, 2, 3, 4, 6]),
            Err(GameError::WrongStage { .. })
        ));
        assert_eq!(s.phase(), Phase::AwaitDecision);
        assert_eq!(s.current_player().current_score, 5);
    }

    #[test]
    fn test_decision_without_pending_roll_rejected() {
        let mut s = session(2);
        assert!(matches!(
            s.submit_decision(Decision::Bank),
            Err(GameError::WrongStage { .. })
        ));
        assert_eq!(s.current_player_index(), 0);
    }

    #[test]
    fn test_seeded_roll_stays_consistent() {
        let mut s = session(2);
        let outcome = s.roll().unwrap();
        assert_eq!(outcome.faces.len(), 5);
        assert_eq!(s.last_roll(), Some(&outcome));
        match s.phase() {
            Phase::AwaitDecision => assert_eq!(s.current_player_index(), 0),
            Phase::TurnEnded => assert_eq!(s.current_player_index(), 1),
            other => panic!("unexpected phase {:?}", other),
        }
    }

    #[test]
    fn test_advance_turn_rejected_mid_turn() {
        let mut s = session(2);
        s.roll_with(vec![1, 2, 3, 4, 6]).unwrap();
        assert_eq!(
            s.advance_turn(),
            Err(GameError::WrongStage {
                action: "advance turn",
                stage: TurnStage::AwaitingDecision,
            })
        );

        // 選擇繼續後回到 Idle，但回合分數仍在
        s.submit_decision(Decision::Continue).unwrap();
        assert!(matches!(
            s.advance_turn(),
            Err(GameError::WrongStage { .. })
        ));
        assert_eq!(s.current_player_index(), 0);
        assert_eq!(s.current_player().current_score, 10);

        // 狀態沒壞：仍可正常存分
        s.roll_with(vec![5, 2, 3, 4, 6]).unwrap();
        assert_eq!(s.submit_decision(Decision::Bank), Ok(Phase::TurnEnded));
        assert_eq!(s.players()[0].total_score, 15);
        assert_eq!(s.current_player_index(), 1);
    }

    #[test]
    fn test_rejected_roll_keeps_turn_ended_phase() {
        let mut s = session(2);
        s.roll_with(vec![2, 3, 4, 6, 6]).unwrap();
        assert_eq!(s.phase(), Phase::TurnEnded);

        assert_eq!(
            s.roll_with(vec![1, 2]),
            Err(GameError::DiceCountMismatch {
                expected: 5,
                got: 2
            })
        );
        assert_eq!(s.roll_with(vec![1, 2, 3, 4, 7]), Err(GameError::InvalidFace(7)));
        assert_eq!(s.phase(), Phase::TurnEnded);
        assert_eq!(s.current_player_index(), 1);

        s.roll_with(vec![1, 2, 3, 4, 6]).unwrap();
        assert_eq!(s.phase(), Phase::AwaitDecision);
    }

    #[test]
    fn test_session_frozen_after_win() {
        let mut s = session(2);
        s.record_bank(0, 990).unwrap();
        s.roll_with(vec![1, 2, 3, 4, 6]).unwrap();
        assert_eq!(s.submit_decision(Decision::Bank), Ok(Phase::GameWon));

        assert_eq!(s.advance_turn(), Err(GameError::GameOver));
        assert_eq!(s.record_bank(1, 5000), Err(GameError::GameOver));
        assert_eq!(s.current_player_index(), 0);
        assert_eq!(s.players()[1].total_score, 0);
        assert_eq!(s.winner().map(|p| p.name.as_str()), Some("P1"));
        assert_eq!(s.phase(), Phase::GameWon);
    }
}
