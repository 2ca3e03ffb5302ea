//! Observation 構建
//!
//! 每次狀態變化後提供給呈現層的快照，包含：
//! - 當前玩家名字、總分、本回合分數
//! - 活動骰子與擱置骰子
//! - 當前階段（await-roll / await-decision / turn-ended / game-won）
//! - 最近一擲、上一個結束的回合、勝利者

use serde_json::{json, Value};

use super::state::{GameSession, TurnRecord};
use super::turn::RollOutcome;
use crate::game::{Phase, TurnEnd};

/// 計分板中的一列
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreLine {
    pub name: String,
    pub total_score: u32,
    pub current_score: u32,
}

/// 呈現層快照
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: Phase,
    pub current_player: String,
    pub total_score: u32,
    pub current_score: u32,
    pub active_dice: Vec<u8>,
    pub set_aside_dice: Vec<u8>,
    pub last_roll: Option<RollOutcome>,
    pub last_turn: Option<(String, TurnEnd)>,
    pub winner: Option<ScoreLine>,
    pub scoreboard: Vec<ScoreLine>,
}

/// 從遊戲狀態構建快照
pub fn observation_from_session(session: &GameSession) -> Snapshot {
    let player = session.current_player();
    let scoreboard: Vec<ScoreLine> = session
        .players()
        .iter()
        .map(|p| ScoreLine {
            name: p.name.clone(),
            total_score: p.total_score,
            current_score: p.current_score,
        })
        .collect();

    let last_turn = session.last_turn().map(|TurnRecord { player_index, end }| {
        (session.players()[player_index].name.clone(), end)
    });

    Snapshot {
        phase: session.phase(),
        current_player: player.name.clone(),
        total_score: player.total_score,
        current_score: player.current_score,
        active_dice: session.turn().active_dice().to_vec(),
        set_aside_dice: session.turn().set_aside_dice().to_vec(),
        last_roll: session.last_roll().cloned(),
        last_turn,
        winner: session.winner().map(|w| ScoreLine {
            name: w.name.clone(),
            total_score: w.total_score,
            current_score: w.current_score,
        }),
        scoreboard,
    }
}

impl Snapshot {
    /// JSON 形式（每次狀態變化輸出一行）
    pub fn to_json(&self) -> Value {
        let last_roll = self.last_roll.as_ref().map(|roll| {
            json!({
                "faces": roll.faces,
                "gained": roll.score.gained,
                "pool_score": roll.score.pool_score,
                "scoring_dice": roll.score.scoring_dice,
                "bust": roll.is_bust(),
            })
        });

        let last_turn = self.last_turn.as_ref().map(|(name, end)| match end {
            TurnEnd::Bust { forfeited } => json!({
                "player": name,
                "result": "bust",
                "forfeited": forfeited,
            }),
            TurnEnd::Banked { amount } => json!({
                "player": name,
                "result": "banked",
                "amount": amount,
            }),
        });

        let scoreboard: Vec<Value> = self.scoreboard.iter().map(score_line_json).collect();

        json!({
            "phase": self.phase.as_str(),
            "current_player": self.current_player,
            "total_score": self.total_score,
            "current_score": self.current_score,
            "active_dice": self.active_dice,
            "set_aside_dice": self.set_aside_dice,
            "last_roll": last_roll,
            "last_turn": last_turn,
            "winner": self.winner.as_ref().map(score_line_json),
            "scoreboard": scoreboard,
        })
    }
}

fn score_line_json(line: &ScoreLine) -> Value {
    json!({
        "name": line.name,
        "total_score": line.total_score,
        "current_score": line.current_score,
    })
}

// ============================================================================
// 單元測試
// ============================================================================
