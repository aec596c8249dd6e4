//! Samples emitted by one scrape.

use chrono::TimeDelta;

use crate::catalog::MetricDesc;

/// Value reported for a duration whose reference timestamp is unknown.
pub const ABSENT_SECONDS: f64 = -1.0;

/// One value of a catalog metric, with its label values.
///
/// `label_values` must match `desc.labels` in length. The constructors check
/// this with `debug_assert!` only, so release builds accept a mismatched
/// sample, and the public fields allow building one directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// The metric family this sample belongs to.
    pub desc: &'static MetricDesc,
    /// Label values, in the order of `desc.labels`.
    pub label_values: Vec<String>,
    /// The sample value.
    pub value: f64,
}

impl Sample {
    /// Create a sample for an unlabeled metric.
    pub fn unlabeled(desc: &'static MetricDesc, value: f64) -> Self {
        Self::labeled(desc, Vec::new(), value)
    }

    /// Create a sample with label values.
    ///
    /// Panics in debug builds if the number of values differs from the
    /// number of labels declared by `desc`.
    pub fn labeled(desc: &'static MetricDesc, label_values: Vec<String>, value: f64) -> Self {
        debug_assert_eq!(
            desc.labels.len(),
            label_values.len(),
            "label arity mismatch for {}",
            desc.name
        );
        Self {
            desc,
            label_values,
            value,
        }
    }

    /// Get the value of a label by name.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.desc
            .labels
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }
}

/// Convert a signed duration to fractional seconds, or the absent sentinel.
pub fn seconds_or_absent(delta: Option<TimeDelta>) -> f64 {
    match delta {
        Some(delta) => delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9,
        None => ABSENT_SECONDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CALLS_ACTIVE, SERVICE_CPU};

    #[test]
    fn test_label_lookup() {
        let sample = Sample::labeled(&SERVICE_CPU, vec!["nginx".to_string()], 2.5);
        assert_eq!(sample.label("name"), Some("nginx"));
        assert_eq!(sample.label("other"), None);

        let sample = Sample::unlabeled(&CALLS_ACTIVE, 1.0);
        assert!(sample.label_values.is_empty());
        assert_eq!(sample.label("name"), None);
    }

    #[test]
    #[should_panic(expected = "label arity mismatch")]
    #[cfg(debug_assertions)]
    fn test_label_arity_checked() {
        Sample::unlabeled(&SERVICE_CPU, 1.0);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_label_arity_unchecked_in_release() {
        let sample = Sample::unlabeled(&SERVICE_CPU, 1.0);
        assert!(sample.label_values.is_empty());
        assert_eq!(sample.label("name"), None);
    }

    #[test]
    fn test_seconds_or_absent() {
        assert_eq!(seconds_or_absent(None), ABSENT_SECONDS);
        assert_eq!(seconds_or_absent(Some(TimeDelta::seconds(3600))), 3600.0);
        assert_eq!(seconds_or_absent(Some(TimeDelta::milliseconds(1500))), 1.5);
        assert_eq!(seconds_or_absent(Some(TimeDelta::milliseconds(-1500))), -1.5);
        assert_eq!(seconds_or_absent(Some(TimeDelta::zero())), 0.0);
    }
}
