//! 擲骰評估服務

use crate::game::{die_score, score, MIN_GAIN};

/// 單次擲骰的評估結果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollScoreResult {
    /// 逐顆計分後的加總，決定爆掉與否
    pub gained: u32,
    /// 整組骰面（含三條獎勵）的分數，只供顯示
    pub pool_score: u32,
    /// 每顆骰子是否單獨得分
    pub scoring_dice: Vec<bool>,
}

impl RollScoreResult {
    pub fn qualifies(&self) -> bool {
        self.gained >= MIN_GAIN
    }
}

/// 評估一次擲骰
///
/// 每顆骰子各自作為單元素輸入計分再加總，因此三條獎勵在此永遠不會觸發；
/// 整組分數另外計算但不參與判定。
pub fn evaluate_roll(faces: &[u8]) -> RollScoreResult {
    let per_die: Vec<u32> = faces.iter().map(|&face| die_score(face)).collect();

    RollScoreResult {
        gained: per_die.iter().sum(),
        pool_score: score(faces),
        scoring_dice: per_die.iter().map(|&points| points > 0).collect(),
    }
}

// ============================================================================
// 單元測試
// ============================================================================
