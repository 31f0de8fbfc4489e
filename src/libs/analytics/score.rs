//! Productivity score (0-100).

use super::round2;
use crate::libs::config::ScoreWeights;

/// Metrics the score is built from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreInputs {
    /// Overall completion rate, percent.
    pub completion_rate: f64,
    pub average_tasks_per_day: f64,
    pub current_streak: u32,
    /// Completion rate of high-priority tasks, percent; 0 when there are none.
    pub high_priority_completion_rate: f64,
}

/// Weighted score, clamped to `[0, 100]` and rounded to two decimals.
///
/// Rates are clamped to `[0, 100]` and the throughput and streak ratios to
/// `[0, 1]` before weighting.
pub fn productivity_score(inputs: &ScoreInputs, weights: &ScoreWeights) -> f64 {
    let completion = inputs.completion_rate.clamp(0.0, 100.0);
    let high_priority = inputs.high_priority_completion_rate.clamp(0.0, 100.0);
    let throughput = ratio(inputs.average_tasks_per_day, weights.throughput_target);
    let streak = ratio(f64::from(inputs.current_streak), weights.streak_target);

    let score = weights.completion_rate_weight * completion
        + weights.throughput_weight * throughput
        + weights.streak_weight * streak
        + weights.high_priority_weight * high_priority;

    if score.is_finite() {
        round2(score.clamp(0.0, 100.0))
    } else {
        0.0
    }
}

fn ratio(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (value / target).clamp(0.0, 1.0)
}
