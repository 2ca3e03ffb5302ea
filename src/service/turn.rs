//! 回合控制器
//!
//! 單一玩家回合的狀態機：
//! `Idle` → `Rolled` → 評估 → `AwaitingDecision`（達標）或 `Ended(Bust)`；
//! `AwaitingDecision` 之後繼續回到 `Idle`，存分則 `Ended(Banked)`。
//!
//! 規則重點：
//! - 得分以逐顆計分加總（三條獎勵不參與）
//! - 只要達標，整組活動骰子全部移到擱置區，包含沒得分的骰子
//! - 活動骰子清空後繼續，下一擲會以完整 `DICE_COUNT` 顆重新開始

use tracing::debug;

use super::scoring::{evaluate_roll, RollScoreResult};
use crate::game::{DiceRoller, Decision, GameError, TurnEnd, TurnStage, DICE_COUNT, FACE_COUNT};

/// 一次擲骰及其評估
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollOutcome {
    pub faces: Vec<u8>,
    pub score: RollScoreResult,
    /// 評估後的回合階段
    pub stage: TurnStage,
}

impl RollOutcome {
    pub fn is_bust(&self) -> bool {
        matches!(self.stage, TurnStage::Ended(TurnEnd::Bust { .. }))
    }
}

/// 回合狀態
#[derive(Clone, Debug)]
pub struct TurnController {
    stage: TurnStage,
    active_dice: Vec<u8>,
    set_aside_dice: Vec<u8>,
    current_score: u32,
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnController {
    pub fn new() -> Self {
        Self {
            stage: TurnStage::Idle,
            active_dice: Vec::with_capacity(DICE_COUNT),
            set_aside_dice: Vec::with_capacity(DICE_COUNT),
            current_score: 0,
        }
    }

    pub fn stage(&self) -> TurnStage {
        self.stage
    }

    pub fn active_dice(&self) -> &[u8] {
        &self.active_dice
    }

    pub fn set_aside_dice(&self) -> &[u8] {
        &self.set_aside_dice
    }

    pub fn current_score(&self) -> u32 {
        self.current_score
    }

    /// 下一擲的骰子數；活動骰子已清空時回到完整一組
    pub fn dice_to_roll(&self) -> usize {
        if self.active_dice.is_empty() {
            DICE_COUNT
        } else {
            self.active_dice.len()
        }
    }

    /// `Idle → Rolled`：以共用擲骰器擲出活動骰子
    pub fn roll(&mut self, roller: &mut DiceRoller) -> Result<&[u8], GameError> {
        self.expect_stage(TurnStage::Idle, "roll")?;
        let faces = roller.roll(self.dice_to_roll());
        self.place_roll(faces)?;
        Ok(&self.active_dice)
    }

    /// `Idle → Rolled`：放入外部給定的骰面（重播或測試用，無需等待動畫）
    pub fn place_roll(&mut self, faces: Vec<u8>) -> Result<(), GameError> {
        self.expect_stage(TurnStage::Idle, "roll")?;

        let expected = self.dice_to_roll();
        if faces.len() != expected {
            return Err(GameError::DiceCountMismatch {
                expected,
                got: faces.len(),
            });
        }
        if let Some(&bad) = faces.iter().find(|f| !(1..=FACE_COUNT as u8).contains(f)) {
            return Err(GameError::InvalidFace(bad));
        }

        // 新的一組骰子：上一輪擱置的骰子歸還
        if self.active_dice.is_empty() {
            self.set_aside_dice.clear();
        }

        debug!(faces = ?faces, "dice rolled");
        self.active_dice = faces;
        self.stage = TurnStage::Rolled;
        Ok(())
    }

    /// `Rolled → Evaluated`：套用爆掉／達標規則
    pub fn evaluate(&mut self) -> Result<RollOutcome, GameError> {
        self.expect_stage(TurnStage::Rolled, "evaluate")?;

        let faces = self.active_dice.clone();
        let score = evaluate_roll(&faces);

        if score.qualifies() {
            // 整組活動骰子都擱置，不只得分的骰子
            self.set_aside_dice.append(&mut self.active_dice);
            self.current_score += score.gained;
            self.stage = TurnStage::AwaitingDecision;
        } else {
            let forfeited = std::mem::take(&mut self.current_score);
            self.stage = TurnStage::Ended(TurnEnd::Bust { forfeited });
        }

        debug!(
            gained = score.gained,
            pool_score = score.pool_score,
            current_score = self.current_score,
            stage = ?self.stage,
            "roll evaluated"
        );

        Ok(RollOutcome {
            faces,
            score,
            stage: self.stage,
        })
    }

    /// 處理玩家決策：繼續回到 `Idle`，存分結束回合
    pub fn decide(&mut self, decision: Decision) -> Result<TurnStage, GameError> {
        self.expect_stage(TurnStage::AwaitingDecision, "decide")?;

        self.stage = match decision {
            Decision::Continue => TurnStage::Idle,
            Decision::Bank => TurnStage::Ended(TurnEnd::Banked {
                amount: std::mem::take(&mut self.current_score),
            }),
        };
        Ok(self.stage)
    }

    fn expect_stage(&self, expected: TurnStage, action: &'static str) -> Result<(), GameError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(GameError::WrongStage {
                action,
                stage: self.stage,
            })
        }
    }
}

// ============================================================================
// 單元測試
// ============================================================================
