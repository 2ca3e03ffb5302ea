//! 遊戲常量定義

// ============================================================================
// 遊戲規則常量
// ============================================================================

pub const DICE_COUNT: usize = 5;         // 每回合起始骰子數
pub const FACE_COUNT: usize = 6;         // 骰子面數
pub const MIN_GAIN: u32 = 5;             // 單次擲骰最低得分，低於此值即爆掉
pub const WINNING_SCORE: u32 = 1000;     // 勝利所需總分
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;

// ============================================================================
// 計分常量
// ============================================================================

pub const POINTS_PER_ONE: u32 = 10;      // 每顆 1 點
pub const POINTS_PER_FIVE: u32 = 5;      // 每顆 5 點
pub const SET_SIZE: u32 = 3;             // 三條
pub const SET_MULTIPLIER: u32 = 10;      // 三條獎勵 = 點數 × 10

// ============================================================================
// 呈現層預設值
// ============================================================================

pub const ANIMATION_FRAMES: u32 = 30;    // 動畫幀數（約 3 秒）
pub const ANIMATION_FRAME_MS: u64 = 100; // 每幀間隔

// ============================================================================
// Action 常量
// ============================================================================

pub const ACTION_ROLL: usize = 0;
pub const ACTION_CONTINUE: usize = 1;
pub const ACTION_BANK: usize = 2;

pub const ACTION_COUNT: usize = 3;
