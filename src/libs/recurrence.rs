//! Recurrence expansion: turning a rule into concrete occurrence dates.
//!
//! Expansion is a pure, bounded computation. [`expand`] walks forward from the
//! start date one [`next_occurrence`] step at a time and stops at the horizon,
//! at the rule's `count`, or at [`MAX_OCCURRENCES`], whichever comes first.
//!
//! Materializing instances is a two-stage affair: [`expand`] produces the raw
//! sequence, then [`instance_dates`] validates the rule, applies the rule's end
//! date, restricts the sequence to the requested range and drops the start date
//! itself (the parent task already occupies it).
//!
//! ## Stepping rules
//!
//! | type      | step                                                          |
//! |-----------|---------------------------------------------------------------|
//! | `daily`   | `interval` days                                               |
//! | `weekly`  | `7 * interval` days, or the next listed weekday within 7 days |
//! | `monthly` | `interval` calendar months, clamped to the last day of month  |
//! | `yearly`  | `interval` years (Feb 29 clamps to Feb 28)                    |
//! | `none`    | no step; the sequence is just the start date                  |

use crate::libs::error::RecurrenceError;
use crate::libs::task::{RecurrenceRule, RecurrenceType, Task};
use chrono::{Datelike, Duration, Months, NaiveDateTime};
use tracing::{debug, warn};

/// Hard cap on emitted occurrences, regardless of count and end date.
pub const MAX_OCCURRENCES: usize = 1000;

/// Computes the occurrence following `current`, or `None` when the rule does
/// not step (type `none`) or the date arithmetic overflows.
pub fn next_occurrence(current: NaiveDateTime, rule: &RecurrenceRule) -> Option<NaiveDateTime> {
    let interval = rule.interval;
    match rule.kind {
        RecurrenceType::None => None,
        RecurrenceType::Daily => current.checked_add_signed(Duration::days(i64::from(interval))),
        RecurrenceType::Weekly => {
            let fallback = || current.checked_add_signed(Duration::weeks(i64::from(interval)));
            match rule.weekdays.as_deref() {
                // An empty weekday list never matches, so it takes the fallback.
                Some(weekdays) => next_listed_weekday(current, weekdays).or_else(fallback),
                None => fallback(),
            }
        }
        RecurrenceType::Monthly => current.checked_add_months(Months::new(interval)),
        RecurrenceType::Yearly => current.checked_add_months(Months::new(interval.checked_mul(12)?)),
    }
}

/// First date within the next 7 days whose weekday (0 = Sunday) is listed.
fn next_listed_weekday(current: NaiveDateTime, weekdays: &[u8]) -> Option<NaiveDateTime> {
    (1..=7)
        .filter_map(|offset| current.checked_add_signed(Duration::days(offset)))
        .find(|candidate| {
            let index = candidate.weekday().num_days_from_sunday();
            weekdays.iter().any(|&day| u32::from(day) == index)
        })
}

/// Expands `rule` from `start` up to and including `horizon_end`.
///
/// The start date is always the first element. Further occurrences are
/// emitted while they fall on or before the horizon and the rule's `count`
/// (start included) is not exhausted. Never returns more than
/// [`MAX_OCCURRENCES`] dates.
///
/// The rule is expected to be validated already; an `interval` of zero would
/// repeat the start date until the cap is reached.
pub fn expand(start: NaiveDateTime, rule: &RecurrenceRule, horizon_end: NaiveDateTime) -> Vec<NaiveDateTime> {
    let limit = rule
        .count
        .map_or(MAX_OCCURRENCES, |count| (count as usize).min(MAX_OCCURRENCES))
        .max(1);

    let mut occurrences = vec![start];
    let mut current = start;

    while current <= horizon_end && occurrences.len() < limit {
        let Some(next) = next_occurrence(current, rule) else {
            break;
        };
        current = next;
        if current <= horizon_end {
            occurrences.push(current);
        }
    }

    occurrences
}

/// True when `occurrences` stopped at the safety cap rather than at the
/// horizon or the rule's own count.
pub fn was_truncated(rule: &RecurrenceRule, occurrences: &[NaiveDateTime]) -> bool {
    occurrences.len() >= MAX_OCCURRENCES && rule.count.map_or(true, |count| count as usize > MAX_OCCURRENCES)
}

/// Dates at which instances of `parent` should exist within `[range_start, range_end]`.
///
/// Fails with [`RecurrenceError::NotRecurring`] when the task has no active
/// rule, and with a validation error when the rule is malformed. The parent's
/// own date is never part of the result.
pub fn instance_dates(
    parent: &Task,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
) -> Result<Vec<NaiveDateTime>, RecurrenceError> {
    let rule = parent.recurrence_rule().ok_or(RecurrenceError::NotRecurring(parent.id))?;
    rule.validate()?;

    let horizon = rule.horizon(range_end);
    let occurrences = expand(parent.date, rule, horizon);
    if was_truncated(rule, &occurrences) {
        warn!(
            task_id = parent.id,
            limit = MAX_OCCURRENCES,
            "recurrence expansion truncated at the occurrence limit"
        );
    }

    let dates: Vec<NaiveDateTime> = occurrences
        .into_iter()
        .filter(|date| *date >= range_start && *date <= range_end && *date != parent.date)
        .collect();

    debug!(task_id = parent.id, rule = %rule.kind, count = dates.len(), "expanded recurrence");
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::task::Priority;
    use chrono::{NaiveDate, Weekday};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    fn parent(date: NaiveDateTime, rule: Option<RecurrenceRule>) -> Task {
        Task {
            id: 7,
            title: "Water plants".to_string(),
            date,
            order: 0,
            priority: Priority::Medium,
            completed: false,
            created_at: date,
            updated_at: date,
            is_recurring: rule.as_ref().is_some_and(RecurrenceRule::is_recurring),
            recurrence: rule,
            parent_task_id: None,
        }
    }

    #[test]
    fn daily_dates_are_interval_apart() {
        let start = at(2024, 1, 1);
        let horizon = at(2024, 1, 31);
        for interval in 1..=5u32 {
            let dates = expand(start, &RecurrenceRule::daily(interval), horizon);
            let span = (horizon - start).num_days();
            assert_eq!(dates.len() as i64, span / i64::from(interval) + 1);
            for pair in dates.windows(2) {
                assert_eq!((pair[1] - pair[0]).num_days(), i64::from(interval));
            }
        }
    }

    #[test]
    fn daily_respects_count() {
        let dates = expand(at(2024, 1, 1), &RecurrenceRule::daily(1).with_count(3), at(2024, 12, 31));
        assert_eq!(dates, vec![at(2024, 1, 1), at(2024, 1, 2), at(2024, 1, 3)]);
    }

    #[test]
    fn weekly_weekdays_follow_listed_days() {
        // 2024-01-01 is a Monday.
        let start = at(2024, 1, 1);
        assert_eq!(start.weekday(), Weekday::Mon);
        let rule = RecurrenceRule::weekly(1).with_weekdays(vec![1, 3, 5]);
        let dates = expand(start, &rule, at(2024, 3, 1));
        let firsts: Vec<Weekday> = dates.iter().take(5).map(|d| d.weekday()).collect();
        assert_eq!(firsts, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri, Weekday::Mon, Weekday::Wed]);
        assert_eq!(dates[3], at(2024, 1, 8));
        assert_eq!(dates[4], at(2024, 1, 10));
    }

    #[test]
    fn weekly_without_weekdays_steps_whole_weeks() {
        let dates = expand(at(2024, 1, 3), &RecurrenceRule::weekly(2), at(2024, 2, 1));
        assert_eq!(dates, vec![at(2024, 1, 3), at(2024, 1, 17), at(2024, 1, 31)]);
    }

    #[test]
    fn weekly_with_empty_weekdays_falls_back_to_interval() {
        let rule = RecurrenceRule::weekly(1).with_weekdays(vec![]);
        assert_eq!(next_occurrence(at(2024, 1, 3), &rule), Some(at(2024, 1, 10)));
    }

    #[test]
    fn monthly_clamps_short_months() {
        let dates = expand(at(2024, 1, 31), &RecurrenceRule::monthly(1), at(2024, 4, 30));
        assert_eq!(dates, vec![at(2024, 1, 31), at(2024, 2, 29), at(2024, 3, 29), at(2024, 4, 29)]);
    }

    #[test]
    fn yearly_steps_years_and_clamps_leap_day() {
        let dates = expand(at(2024, 2, 29), &RecurrenceRule::yearly(1), at(2026, 12, 31));
        assert_eq!(dates, vec![at(2024, 2, 29), at(2025, 2, 28), at(2026, 2, 28)]);
    }

    #[test]
    fn none_yields_only_start() {
        let rule = RecurrenceRule::new(RecurrenceType::None, 1);
        assert_eq!(expand(at(2024, 5, 5), &rule, at(2030, 1, 1)), vec![at(2024, 5, 5)]);
    }

    #[test]
    fn start_is_emitted_even_past_horizon() {
        assert_eq!(expand(at(2024, 5, 5), &RecurrenceRule::daily(1), at(2024, 5, 1)), vec![at(2024, 5, 5)]);
    }

    #[test]
    fn never_exceeds_cap() {
        let rule = RecurrenceRule::daily(1);
        let dates = expand(at(2000, 1, 1), &rule, at(2100, 1, 1));
        assert_eq!(dates.len(), MAX_OCCURRENCES);
        assert!(was_truncated(&rule, &dates));

        let huge_count = RecurrenceRule::daily(1).with_count(5000);
        assert_eq!(expand(at(2000, 1, 1), &huge_count, at(2100, 1, 1)).len(), MAX_OCCURRENCES);

        // A zero interval would never advance; the cap still terminates it.
        let stuck = RecurrenceRule::daily(0);
        assert_eq!(expand(at(2000, 1, 1), &stuck, at(2100, 1, 1)).len(), MAX_OCCURRENCES);
    }

    #[test]
    fn instance_dates_filters_range_and_start() {
        let task = parent(at(2024, 1, 1), Some(RecurrenceRule::daily(1)));
        let dates = instance_dates(&task, at(2023, 12, 1), at(2024, 1, 4)).unwrap();
        assert_eq!(dates, vec![at(2024, 1, 2), at(2024, 1, 3), at(2024, 1, 4)]);

        let narrowed = instance_dates(&task, at(2024, 1, 3), at(2024, 1, 4)).unwrap();
        assert_eq!(narrowed, vec![at(2024, 1, 3), at(2024, 1, 4)]);
    }

    #[test]
    fn instance_dates_honours_rule_end_date() {
        let rule = RecurrenceRule::daily(1).with_end_date(at(2024, 1, 3));
        let task = parent(at(2024, 1, 1), Some(rule));
        let dates = instance_dates(&task, at(2024, 1, 1), at(2024, 2, 1)).unwrap();
        assert_eq!(dates, vec![at(2024, 1, 2), at(2024, 1, 3)]);
    }

    #[test]
    fn instance_dates_rejects_non_recurring_and_invalid() {
        let plain = parent(at(2024, 1, 1), None);
        assert_eq!(
            instance_dates(&plain, at(2024, 1, 1), at(2024, 2, 1)),
            Err(RecurrenceError::NotRecurring(7))
        );

        let none = parent(at(2024, 1, 1), Some(RecurrenceRule::new(RecurrenceType::None, 1)));
        assert_eq!(
            instance_dates(&none, at(2024, 1, 1), at(2024, 2, 1)),
            Err(RecurrenceError::NotRecurring(7))
        );

        let invalid = parent(at(2024, 1, 1), Some(RecurrenceRule::weekly(1).with_weekdays(vec![9])));
        assert_eq!(
            instance_dates(&invalid, at(2024, 1, 1), at(2024, 2, 1)),
            Err(RecurrenceError::InvalidWeekday(9))
        );
    }
}
