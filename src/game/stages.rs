//! 回合階段與玩家決策定義

/// 單一回合的狀態機階段
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnStage {
    /// 等待擲骰
    Idle,
    /// 已擲出、尚未評估
    Rolled,
    /// 已評估且達標，等待繼續或存分
    AwaitingDecision,
    /// 回合結束
    Ended(TurnEnd),
}

/// 回合結束方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnEnd {
    /// 爆掉，`forfeited` 為作廢的本回合分數
    Bust { forfeited: u32 },
    /// 存分
    Banked { amount: u32 },
}

/// 達標後玩家的二選一
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Bank,
}

/// 對外呈現的遊戲階段
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitRoll,
    AwaitDecision,
    TurnEnded,
    GameWon,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::AwaitRoll => "await-roll",
            Phase::AwaitDecision => "await-decision",
            Phase::TurnEnded => "turn-ended",
            Phase::GameWon => "game-won",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameWon)
    }
}

impl TurnStage {
    pub fn is_ended(&self) -> bool {
        matches!(self, TurnStage::Ended(_))
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::AwaitRoll.as_str(), "await-roll");
        assert_eq!(Phase::AwaitDecision.as_str(), "await-decision");
        assert_eq!(Phase::TurnEnded.as_str(), "turn-ended");
        assert_eq!(Phase::GameWon.as_str(), "game-won");
    }

    #[test]
    fn test_terminal_flags() {
        assert!(Phase::GameWon.is_terminal());
        assert!(!Phase::TurnEnded.is_terminal());
        assert!(TurnStage::Ended(TurnEnd::Bust { forfeited: 0 }).is_ended());
        assert!(!TurnStage::AwaitingDecision.is_ended());
    }
}
