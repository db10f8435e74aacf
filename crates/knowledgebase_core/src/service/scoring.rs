//! Proficiency score accumulator.
//!
//! Rules, for a mark already known to be within `[MIN_MARK, MAX_MARK]`:
//! - a zero mark means the item was forgotten and resets the score;
//! - a mark below the previous one lowers the score by the difference;
//! - otherwise the score grows by the full mark (not the difference).
//!
//! The result is clamped to `[MIN_SCORE, MAX_SCORE]`.

use crate::model::knowledge_item::{KnowledgeItem, MAX_SCORE, MIN_MARK, MIN_SCORE};

/// Computes the score that follows `mark`, given the current state.
pub fn next_score(score: i64, last_mark: i64, mark: i64) -> i64 {
    let raw = if mark == MIN_MARK {
        MIN_SCORE
    } else if last_mark > mark {
        score + (mark - last_mark)
    } else {
        score + mark
    };

    raw.clamp(MIN_SCORE, MAX_SCORE)
}

/// Applies `mark` to the item's score and records it as the latest mark.
pub fn apply_mark(item: &mut KnowledgeItem, mark: i64) {
    item.score = next_score(item.score, item.last_mark, mark);
    item.last_mark = mark;
}
