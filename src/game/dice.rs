//! 擲骰器
//!
//! 整場遊戲共用同一個已播種的亂數來源，不在每次擲骰時重新建立。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::constants::FACE_COUNT;

/// 骰子亂數來源
pub struct DiceRoller {
    rng: StdRng,
}

impl DiceRoller {
    /// 以固定種子建立（可重現）
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// 以系統熵建立
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// 擲 `count` 顆骰子，每顆均勻分布於 1..=6
    pub fn roll(&mut self, count: usize) -> Vec<u8> {
        (0..count)
            .map(|_| self.rng.gen_range(1..=FACE_COUNT as u8))
            .collect()
    }
}

impl Default for DiceRoller {
    fn default() -> Self {
        Self::from_entropy()
    }
}

// ============================================================================
// 單元測試
// ============================================================================
