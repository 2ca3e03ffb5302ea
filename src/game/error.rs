//! 錯誤定義
//!
//! 核心沒有可恢復的執行期錯誤；這裡的變體全部是呼叫端違反約定
//! （在錯誤階段呼叫、建立參數越界），回傳時狀態不會被修改。

use thiserror::Error;

use super::constants::{MAX_PLAYERS, MIN_PLAYERS};
use super::stages::TurnStage;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("player count {0} out of range ({min}..={max})", min = MIN_PLAYERS, max = MAX_PLAYERS)]
    InvalidPlayerCount(usize),
    #[error("expected {expected} player names, got {got}")]
    NameCountMismatch { expected: usize, got: usize },
    #[error("player {index} has an empty name")]
    EmptyName { index: usize },
    #[error("cannot {action} while turn is {stage:?}")]
    WrongStage {
        action: &'static str,
        stage: TurnStage,
    },
    #[error("expected {expected} dice, got {got}")]
    DiceCountMismatch { expected: usize, got: usize },
    #[error("die face {0} out of range (1..=6)")]
    InvalidFace(u8),
    #[error("game is already over")]
    GameOver,
}
