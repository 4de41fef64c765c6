//! Ranking and best/worst highlighting for a comparison.
//!
//! Ranking always sorts on the first metric the backend reports, descending.
//! Highlighting is per metric and respects polarity: a metric where lower is
//! better flags its minimum as best.


use api::{ComparisonResult, ModelResult, Polarity};
use indexmap::IndexMap;

/// Substrings that mark a metric as lower-is-better when nothing more specific
/// is known.
const LOWER_IS_BETTER_HINTS: [&str; 3] = ["inertia", "mse", "mae"];

const KNOWN_POLARITY: [(&str, Polarity); 10] = [
    ("accuracy", Polarity::HigherIsBetter),
    ("precision", Polarity::HigherIsBetter),
    ("recall", Polarity::HigherIsBetter),
    ("f1_score", Polarity::HigherIsBetter),
    ("roc_auc", Polarity::HigherIsBetter),
    ("r2_score", Polarity::HigherIsBetter),
    ("silhouette_score", Polarity::HigherIsBetter),
    ("mse", Polarity::LowerIsBetter),
    ("mae", Polarity::LowerIsBetter),
    ("inertia", Polarity::LowerIsBetter),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Best,
    Worst,
}

/// Polarity lookup: explicit entries first, then the built-in table, then the
/// substring fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolarityTable {
    explicit: IndexMap<String, Polarity>,
}

impl PolarityTable {
    pub fn new(explicit: IndexMap<String, Polarity>) -> Self {
        Self { explicit }
    }

    pub fn for_result(result: &ComparisonResult) -> Self {
        Self::new(result.metric_polarity.clone())
    }

    pub fn polarity(&self, metric: &str) -> Polarity {
        if let Some(polarity) = self.explicit.get(metric) {
            return *polarity;
        }
        if let Some((_, polarity)) = KNOWN_POLARITY.iter().find(|(key, _)| *key == metric) {
            return *polarity;
        }
        fallback_polarity(metric)
    }
}

/// Substring heuristic for metrics nobody told us about.
pub fn fallback_polarity(metric: &str) -> Polarity {
    if LOWER_IS_BETTER_HINTS.iter().any(|hint| metric.contains(hint)) {
        Polarity::LowerIsBetter
    } else {
        Polarity::HigherIsBetter
    }
}

/// Metric keys in the first model's order.
pub fn metric_keys(models: &[ModelResult]) -> Vec<String> {
    models
        .first()
        .map(|model| model.metrics.keys().cloned().collect())
        .unwrap_or_default()
}

/// Models sorted descending on the first metric. Stable, so equal scores keep
/// their original order. Missing or NaN scores rank last, in input order.
pub fn rank_models(models: &[ModelResult]) -> Vec<&ModelResult> {
    let mut ranked: Vec<&ModelResult> = models.iter().collect();
    let Some(first) = models.first().and_then(|m| m.metrics.keys().next()) else {
        return ranked;
    };
    let score = |model: &ModelResult| {
        let value = model.metric(first);
        if value.is_nan() {
            f64::NEG_INFINITY
        } else {
            value
        }
    };
    ranked.sort_by(|a, b| score(b).total_cmp(&score(a)));
    ranked
}

/// Extremes of one metric across every model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
    pub polarity: Polarity,
}

impl MetricRange {
    pub fn of(models: &[ModelResult], metric: &str, polarity: Polarity) -> Option<Self> {
        let mut values = models.iter().map(|m| m.metric(metric)).filter(|v| !v.is_nan());
        let first = values.next()?;
        let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self { min, max, polarity })
    }

    /// Best wins when every model ties.
    pub fn standing(&self, value: f64) -> Option<Standing> {
        let (best, worst) = match self.polarity {
            Polarity::HigherIsBetter => (self.max, self.min),
            Polarity::LowerIsBetter => (self.min, self.max),
        };
        if value == best {
            Some(Standing::Best)
        } else if value == worst {
            Some(Standing::Worst)
        } else {
            None
        }
    }
}

/// Everything the results table needs, computed once per result.
#[derive(Debug, Clone)]
pub struct Comparison<'a> {
    pub metrics: Vec<String>,
    pub ranked: Vec<&'a ModelResult>,
    ranges: IndexMap<String, MetricRange>,
}

impl<'a> Comparison<'a> {
    pub fn new(models: &'a [ModelResult], polarity: &PolarityTable) -> Self {
        let metrics = metric_keys(models);
        let ranges = metrics
            .iter()
            .filter_map(|metric| {
                MetricRange::of(models, metric, polarity.polarity(metric))
                    .map(|range| (metric.clone(), range))
            })
            .collect();
        Self {
            metrics,
            ranked: rank_models(models),
            ranges,
        }
    }

    pub fn standing(&self, metric: &str, model: &ModelResult) -> Option<Standing> {
        self.ranges
            .get(metric)
            .and_then(|range| range.standing(model.metric(metric)))
    }

    pub fn polarity(&self, metric: &str) -> Option<Polarity> {
        self.ranges.get(metric).map(|range| range.polarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::TaskType;

    fn model(name: &str, metrics: &[(&str, f64)]) -> ModelResult {
        ModelResult {
            name: name.into(),
            task: TaskType::Regression,
            metrics: metrics
                .iter()
                .map(|(key, value)| (key.to_string(), *value))
                .collect(),
            training_time: 0.1,
        }
    }

    fn names(ranked: &[&ModelResult]) -> Vec<String> {
        ranked.iter().map(|m| m.name.clone()).collect()
    }

    #[test]
    fn ranks_descending_on_first_metric() {
        let models = vec![
            model("a", &[("accuracy", 0.7), ("f1_score", 0.9)]),
            model("b", &[("accuracy", 0.9), ("f1_score", 0.1)]),
            model("c", &[("accuracy", 0.8), ("f1_score", 0.5)]),
        ];
        assert_eq!(names(&rank_models(&models)), vec!["b", "c", "a"]);
    }

    #[test]
    fn ranking_is_stable_and_a_permutation() {
        let models = vec![
            model("first", &[("mse", 1.0)]),
            model("second", &[("mse", 3.0)]),
            model("third", &[("mse", 1.0)]),
            model("fourth", &[("mse", 3.0)]),
        ];
        let ranked = rank_models(&models);
        assert_eq!(ranked.len(), models.len());
        assert_eq!(names(&ranked), vec!["second", "fourth", "first", "third"]);
    }

    #[test]
    fn models_missing_the_first_metric_rank_last_without_panicking() {
        let mut models = vec![model("lead", &[("accuracy", 0.2), ("f1_score", 0.5)])];
        models.extend((0..40).map(|idx| {
            let name = format!("m{idx}");
            if idx % 3 == 0 {
                model(&name, &[("f1_score", 0.5)])
            } else {
                model(&name, &[("accuracy", f64::from(idx) / 100.0), ("f1_score", 0.5)])
            }
        }));

        let ranked = rank_models(&models);
        assert_eq!(ranked.len(), models.len());

        let scores: Vec<f64> = ranked.iter().map(|m| m.metric("accuracy")).collect();
        let present = scores.iter().take_while(|v| !v.is_nan()).count();
        assert_eq!(present, 27);
        assert!(scores[..present].windows(2).all(|w| w[0] >= w[1]));
        assert!(scores[present..].iter().all(|v| v.is_nan()));

        let missing: Vec<String> = names(&ranked[present..]);
        let expected: Vec<String> = (0..40).step_by(3).map(|idx| format!("m{idx}")).collect();
        assert_eq!(missing, expected);
    }

    #[test]
    fn nan_scores_rank_after_real_ones() {
        let models = vec![
            model("nan", &[("accuracy", f64::NAN)]),
            model("low", &[("accuracy", 0.1)]),
            model("high", &[("accuracy", 0.9)]),
        ];
        assert_eq!(names(&rank_models(&models)), vec!["high", "low", "nan"]);
    }

    #[test]
    fn ranking_empty_is_empty() {
        assert!(rank_models(&[]).is_empty());
        assert!(metric_keys(&[]).is_empty());
    }

    #[test]
    fn mse_prefers_the_minimum() {
        let models = vec![
            model("a", &[("mse", 2.0)]),
            model("b", &[("mse", 1.0)]),
            model("c", &[("mse", 4.0)]),
        ];
        let cmp = Comparison::new(&models, &PolarityTable::default());
        assert_eq!(cmp.standing("mse", &models[1]), Some(Standing::Best));
        assert_eq!(cmp.standing("mse", &models[2]), Some(Standing::Worst));
        assert_eq!(cmp.standing("mse", &models[0]), None);
    }

    #[test]
    fn accuracy_prefers_the_maximum() {
        let models = vec![
            model("a", &[("accuracy", 0.8)]),
            model("b", &[("accuracy", 0.6)]),
            model("c", &[("accuracy", 0.95)]),
        ];
        let cmp = Comparison::new(&models, &PolarityTable::default());
        assert_eq!(cmp.standing("accuracy", &models[2]), Some(Standing::Best));
        assert_eq!(cmp.standing("accuracy", &models[1]), Some(Standing::Worst));
    }

    #[test]
    fn ties_share_the_indicator() {
        let models = vec![
            model("a", &[("accuracy", 0.9)]),
            model("b", &[("accuracy", 0.9)]),
            model("c", &[("accuracy", 0.5)]),
            model("d", &[("accuracy", 0.5)]),
        ];
        let cmp = Comparison::new(&models, &PolarityTable::default());
        assert_eq!(cmp.standing("accuracy", &models[0]), Some(Standing::Best));
        assert_eq!(cmp.standing("accuracy", &models[1]), Some(Standing::Best));
        assert_eq!(cmp.standing("accuracy", &models[2]), Some(Standing::Worst));
        assert_eq!(cmp.standing("accuracy", &models[3]), Some(Standing::Worst));
    }

    #[test]
    fn all_equal_marks_best() {
        let models = vec![model("a", &[("recall", 0.5)]), model("b", &[("recall", 0.5)])];
        let cmp = Comparison::new(&models, &PolarityTable::default());
        assert_eq!(cmp.standing("recall", &models[0]), Some(Standing::Best));
        assert_eq!(cmp.standing("recall", &models[1]), Some(Standing::Best));
    }

    #[test]
    fn substring_fallback_covers_derived_metrics() {
        let table = PolarityTable::default();
        assert_eq!(table.polarity("rmse"), Polarity::LowerIsBetter);
        assert_eq!(table.polarity("davies_bouldin_inertia"), Polarity::LowerIsBetter);
        assert_eq!(table.polarity("balanced_accuracy"), Polarity::HigherIsBetter);
    }

    #[test]
    fn explicit_polarity_overrides_the_fallback() {
        let mut explicit = IndexMap::new();
        explicit.insert("mse_normalized_inverse".to_string(), Polarity::HigherIsBetter);
        let table = PolarityTable::new(explicit);
        assert_eq!(table.polarity("mse_normalized_inverse"), Polarity::HigherIsBetter);
        assert_eq!(fallback_polarity("mse_normalized_inverse"), Polarity::LowerIsBetter);

        let models = vec![
            model("a", &[("mse_normalized_inverse", 0.2)]),
            model("b", &[("mse_normalized_inverse", 0.8)]),
        ];
        let cmp = Comparison::new(&models, &table);
        assert_eq!(cmp.standing("mse_normalized_inverse", &models[1]), Some(Standing::Best));
    }

    #[test]
    fn missing_values_are_ignored_for_ranges() {
        let models = vec![
            model("a", &[("accuracy", 0.8), ("recall", 0.4)]),
            model("b", &[("accuracy", 0.7)]),
        ];
        let cmp = Comparison::new(&models, &PolarityTable::default());
        assert_eq!(cmp.standing("recall", &models[0]), Some(Standing::Best));
        assert_eq!(cmp.standing("recall", &models[1]), None);
    }
}
