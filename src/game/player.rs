//! 玩家計分紀錄

/// 單一玩家
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    /// 已存入的總分，只增不減
    pub total_score: u32,
    /// 本回合累積分數，非本人回合時恆為 0
    pub current_score: u32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_score: 0,
            current_score: 0,
        }
    }

    /// 存分：總分加上 `amount`，本回合分數清零
    pub fn record_bank(&mut self, amount: u32) {
        self.total_score += amount;
        self.current_score = 0;
    }

    /// 爆掉：本回合分數作廢，回傳損失的分數
    pub fn bust(&mut self) -> u32 {
        std::mem::take(&mut self.current_score)
    }
}

// ============================================================================
// 單元測試
// ============================================================================
