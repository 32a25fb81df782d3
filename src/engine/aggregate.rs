//! Rubric statistics and their cross-document merge
//!
//! Every quantity here is a sum or a count, so per-document results can be
//! computed independently and reduced in any order or grouping. Weights are
//! summed as decimals so that holds exactly for fractional weights too.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::Add;

use super::rubric::RubricView;

/// Totals and label distribution over a set of rubrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_rubrics: usize,
    #[serde(
        serialize_with = "serialize_weight",
        deserialize_with = "rust_decimal::serde::float::deserialize"
    )]
    pub total_weight: Decimal,
    pub label_distribution: BTreeMap<String, usize>,
}

/// Statistics summed over many documents
pub type AggregateStatistics = Statistics;

impl Statistics {
    /// Combine two statistics; commutative and associative
    pub fn merge(mut self, other: Statistics) -> Statistics {
        self.total_rubrics += other.total_rubrics;
        self.total_weight = self.total_weight.saturating_add(other.total_weight);
        for (label, count) in other.label_distribution {
            *self.label_distribution.entry(label).or_insert(0) += count;
        }
        self
    }

    /// Labels ordered by descending count, ties broken by label
    pub fn labels_by_frequency(&self) -> Vec<(&str, usize)> {
        let mut labels: Vec<(&str, usize)> = self
            .label_distribution
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        labels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        labels
    }
}

impl Add for Statistics {
    type Output = Statistics;

    fn add(self, other: Statistics) -> Statistics {
        self.merge(other)
    }
}

impl Sum for Statistics {
    fn sum<I: Iterator<Item = Statistics>>(iter: I) -> Statistics {
        iter.fold(Statistics::default(), Statistics::merge)
    }
}

impl<'a> Sum<&'a Statistics> for Statistics {
    fn sum<I: Iterator<Item = &'a Statistics>>(iter: I) -> Statistics {
        iter.cloned().sum()
    }
}

/// Compute statistics for one document's rubrics.
///
/// Non-numeric weights are skipped rather than rejected, and rubrics without
/// a usable label only count toward `total_rubrics`.
pub fn calculate_statistics(rubrics: &[Value]) -> Statistics {
    let mut stats = Statistics {
        total_rubrics: rubrics.len(),
        ..Statistics::default()
    };

    for rubric in rubrics {
        let view = RubricView::new(rubric);

        if let Some(weight) = view.weight() {
            stats.total_weight = stats.total_weight.saturating_add(weight);
        }

        if let Some(label) = view.label() {
            *stats.label_distribution.entry(label).or_insert(0) += 1;
        }
    }

    stats
}

/// Weight totals go out as plain JSON numbers, rounded once from the exact sum
fn serialize_weight<S: Serializer>(weight: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    let value: f64 = weight
        .normalize()
        .to_string()
        .parse()
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_f64(value)
}

/// Merge any number of statistics into an aggregate
pub fn merge_statistics<'a, I>(stats: I) -> AggregateStatistics
where
    I: IntoIterator<Item = &'a Statistics>,
{
    stats.into_iter().sum()
}

/// Per-model judgement counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTally {
    /// Rubrics carrying this model's judgement object
    pub judged: usize,
    /// Judgements with a `score` field
    pub scored: usize,
    /// Judgements whose score equals 1
    pub passed: usize,
}

impl ModelTally {
    pub fn merge(self, other: ModelTally) -> ModelTally {
        ModelTally {
            judged: self.judged + other.judged,
            scored: self.scored + other.scored,
            passed: self.passed + other.passed,
        }
    }

    /// Share of scored judgements that passed, if any were scored
    pub fn pass_rate(&self) -> Option<f64> {
        (self.scored > 0).then(|| self.passed as f64 / self.scored as f64)
    }
}

/// Judgement tallies keyed by model name (`model1`, `model2`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JudgementSummary(pub BTreeMap<String, ModelTally>);

impl JudgementSummary {
    pub fn merge(mut self, other: JudgementSummary) -> JudgementSummary {
        for (model, tally) in other.0 {
            let entry = self.0.entry(model).or_default();
            *entry = entry.merge(tally);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ModelTally)> {
        self.0.iter()
    }
}

impl Sum for JudgementSummary {
    fn sum<I: Iterator<Item = JudgementSummary>>(iter: I) -> JudgementSummary {
        iter.fold(JudgementSummary::default(), JudgementSummary::merge)
    }
}

/// Tally every `modelN_judgement` across one document's rubrics
pub fn summarize_judgements(rubrics: &[Value]) -> JudgementSummary {
    let mut summary = JudgementSummary::default();

    for rubric in rubrics {
        for judgement in RubricView::new(rubric).judgements() {
            let tally = summary.0.entry(judgement.model.clone()).or_default();
            tally.judged += 1;
            if judgement.score.is_some() {
                tally.scored += 1;
            }
            if judgement.passed() {
                tally.passed += 1;
            }
        }
    }

    summary
}
