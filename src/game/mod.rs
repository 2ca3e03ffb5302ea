//! 遊戲核心模組
//!
//! 包含骰子遊戲的純規則定義：
//! - `constants`: 遊戲常量
//! - `scoring`: 計分引擎
//! - `dice`: 擲骰器
//! - `player`: 玩家計分紀錄
//! - `stages`: 回合階段、決策與呈現階段
//! - `error`: 約定違反錯誤
//!
//! 注意：有狀態的回合與整局流程在 `service` 模組

pub mod constants;
pub mod dice;
pub mod error;
pub mod player;
pub mod scoring;
pub mod stages;

pub use constants::*;
pub use dice::DiceRoller;
pub use error::GameError;
pub use player::Player;
pub use scoring::{die_score, face_counts, score};
pub use stages::{Decision, Phase, TurnEnd, TurnStage};
