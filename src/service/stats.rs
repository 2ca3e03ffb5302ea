//! 擲骰統計
//!
//! 大量擲骰以檢查骰子分布與規則結果（爆掉率、達標平均得分）。
//! 以 rayon 平行處理，每個區塊使用由基礎種子衍生的獨立亂數來源，結果可重現。

use rayon::prelude::*;

use super::scoring::evaluate_roll;
use crate::game::{face_counts, DiceRoller, FACE_COUNT};

const CHUNK_ROLLS: u64 = 10_000;

/// 統計結果
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RollStats {
    pub rolls: u64,
    pub busts: u64,
    pub qualified: u64,
    pub gained_total: u64,
    pub face_counts: [u64; FACE_COUNT],
}

impl RollStats {
    /// 記錄一次擲骰
    pub fn record(&mut self, faces: &[u8]) {
        let result = evaluate_roll(faces);
        self.rolls += 1;
        if result.qualifies() {
            self.qualified += 1;
            self.gained_total += result.gained as u64;
        } else {
            self.busts += 1;
        }
        for (total, count) in self.face_counts.iter_mut().zip(face_counts(faces)) {
            *total += count as u64;
        }
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.rolls += other.rolls;
        self.busts += other.busts;
        self.qualified += other.qualified;
        self.gained_total += other.gained_total;
        for (a, b) in self.face_counts.iter_mut().zip(other.face_counts) {
            *a += b;
        }
        self
    }

    pub fn bust_rate(&self) -> f64 {
        if self.rolls == 0 {
            return 0.0;
        }
        self.busts as f64 / self.rolls as f64
    }

    /// 達標擲骰的平均得分
    pub fn mean_gain(&self) -> f64 {
        if self.qualified == 0 {
            return 0.0;
        }
        self.gained_total as f64 / self.qualified as f64
    }

    /// 骰面分布對均勻分布的卡方統計量（自由度 5）
    pub fn chi_square(&self) -> f64 {
        let total: u64 = self.face_counts.iter().sum();
        if total == 0 {
            return 0.0;
        }
        let expected = total as f64 / FACE_COUNT as f64;
        self.face_counts
            .iter()
            .map(|&c| {
                let diff = c as f64 - expected;
                diff * diff / expected
            })
            .sum()
    }
}

/// 平行擲 `rolls` 次、每次 `dice` 顆骰子
pub fn roll_statistics(rolls: u64, dice: usize, seed: u64) -> RollStats {
    let chunks = rolls.div_ceil(CHUNK_ROLLS);

    (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let count = CHUNK_ROLLS.min(rolls - chunk * CHUNK_ROLLS);
            let mut roller = DiceRoller::new(seed.wrapping_add(chunk));
            let mut stats = RollStats::default();
            for _ in 0..count {
                stats.record(&roller.roll(dice));
            }
            stats
        })
        .reduce(RollStats::default, RollStats::merge)
}

// ============================================================================
// 單元測試
// ============================================================================
