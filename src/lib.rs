//! 多人輪流擲骰計分遊戲（Farkle 類規則）
//!
//! - `game`: 純規則（常量、計分、擲骰、玩家、階段）
//! - `service`: 整局狀態、回合狀態機、呈現層快照

pub mod game;
pub mod service;
