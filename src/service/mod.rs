//! 服務層模組
//!
//! 提供整局遊戲的狀態管理、回合控制、擲骰評估，以及給呈現層的快照與動作遮罩

pub mod action_mask;
pub mod observation;
pub mod scoring;
pub mod state;
pub mod stats;
pub mod turn;

pub use action_mask::action_mask_from_session;
pub use observation::{observation_from_session, ScoreLine, Snapshot};
pub use scoring::{evaluate_roll, RollScoreResult};
pub use state::{create_session, GameSession, TurnRecord};
pub use stats::{roll_statistics, RollStats};
pub use turn::{RollOutcome, TurnController};
