//! 計分引擎
//!
//! 將一組骰面映射為分數，無狀態：
//! - 每顆 1 得 10 分、每顆 5 得 5 分（不論是否成組）
//! - 任一點數出現 3 次以上時，每組完整的三條再加 `點數 × 10`
//!
//! 兩條規則作用於同一批骰子，因此三顆 1 = 30 + 10 = 40。

use super::constants::{FACE_COUNT, POINTS_PER_FIVE, POINTS_PER_ONE, SET_MULTIPLIER, SET_SIZE};

/// 統計每個點數出現的次數（索引 0 對應點數 1）
pub fn face_counts(faces: &[u8]) -> [u32; FACE_COUNT] {
    let mut counts = [0u32; FACE_COUNT];
    for &face in faces {
        debug_assert!((1..=FACE_COUNT as u8).contains(&face), "face out of range: {}", face);
        if (1..=FACE_COUNT as u8).contains(&face) {
            counts[(face - 1) as usize] += 1;
        }
    }
    counts
}

/// 計算一組骰面的分數
pub fn score(faces: &[u8]) -> u32 {
    let counts = face_counts(faces);

    let mut total = counts[0] * POINTS_PER_ONE;
    total += counts[4] * POINTS_PER_FIVE;

    // 三條獎勵：每組完整三條各計一次
    for (idx, &count) in counts.iter().enumerate() {
        if count >= SET_SIZE {
            let value = idx as u32 + 1;
            total += value * SET_MULTIPLIER * (count / SET_SIZE);
        }
    }

    total
}

/// 單顆骰子的分數
pub fn die_score(face: u8) -> u32 {
    score(&[face])
}

// ============================================================================
// 單元測試
// ============================================================================
