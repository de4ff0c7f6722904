/*!
 Contains logic to expand a [`RepeatRule`] into the concrete start times of each repetition.

 Candidates are visited one UTC day at a time, starting from the original start time and ending at
 the rule's end date, inclusive. A candidate becomes a repetition when its calendar day fits the
 rule's [`Pattern`], it is not the original start time, and it does not fall in an exception window.

 Annual-by-day rules are not supported and produce no repetitions.
*/

use crate::{
    datebook::repeat::{Pattern, RepeatRule},
    util::dates::DAY_SECONDS,
};

/// Lazily yields the repetitions of a rule, in ascending order
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    rule: &'a RepeatRule,
    start_time: i64,
    /// Next candidate to test
    candidate: i64,
}

impl<'a> Occurrences<'a> {
    pub fn new(start_time: i64, rule: &'a RepeatRule) -> Self {
        let candidate = match rule.pattern {
            Pattern::AnnualByDay { .. } => {
                tracing::warn!(start_time, "annual by day repetition is not supported");
                rule.end_date.saturating_add(1)
            }
            _ => start_time,
        };
        Self {
            rule,
            start_time,
            candidate,
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        while self.candidate <= self.rule.end_date {
            let candidate = self.candidate;
            self.candidate += DAY_SECONDS;

            if self.rule.pattern.matches(candidate)
                // The original occurrence is not a repetition
                && candidate != self.start_time
                && !self.rule.is_exception(candidate)
            {
                return Some(candidate);
            }
        }
        None
    }
}

/// Collect the repetitions of `rule` for an appointment starting at `start_time`.
///
/// When `limit` is set, expansion stops after that many repetitions.
pub fn expand(start_time: i64, rule: &RepeatRule, limit: Option<usize>) -> Vec<i64> {
    let occurrences = Occurrences::new(start_time, rule);
    match limit {
        Some(max) => {
            let repetitions: Vec<i64> = occurrences.take(max).collect();
            if repetitions.len() == max {
                tracing::warn!(
                    start_time,
                    limit = max,
                    "repetition limit reached, later occurrences dropped"
                );
            }
            repetitions
        }
        None => occurrences.collect(),
    }
}
