//! Column statistics used by the fill and scaling operators.

use std::collections::HashMap;

use crate::table::Value;

// =============================================================================
// STREAMING MOMENTS
// =============================================================================
// Welford's online algorithm for computing mean and variance in a single pass.

/// Mean and variance accumulator using Welford's algorithm.
#[derive(Debug, Clone, Default)]
pub struct Moments {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
}

impl Moments {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate every value of an iterator.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut moments = Self::new();
        for value in values {
            moments.add(value);
        }
        moments
    }

    /// Add a value using Welford's online algorithm.
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, if any value was seen.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Sample variance (n - 1 denominator); needs at least two values.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Sample standard deviation.
    pub fn sample_std(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }
}

/// Median of a set of values; averages the two middle values for even counts.
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Most frequent non-null value. Ties go to the smallest value.
pub fn mode<'a>(values: impl IntoIterator<Item = &'a Value>) -> Option<Value> {
    let mut counts: HashMap<String, (&Value, usize)> = HashMap::new();
    for value in values.into_iter().filter(|v| !v.is_null()) {
        counts.entry(value.to_string()).or_insert((value, 0)).1 += 1;
    }

    counts
        .into_values()
        .max_by(|(a, count_a), (b, count_b)| count_a.cmp(count_b).then_with(|| b.sort_cmp(a)))
        .map(|(value, _)| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moments() {
        let m = Moments::from_values([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(m.count(), 8);
        assert!((m.mean().unwrap() - 5.0).abs() < 1e-12);
        // population variance is 4, sample variance is 32 / 7
        assert!((m.sample_variance().unwrap() - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_moments_small() {
        assert!(Moments::new().mean().is_none());
        assert!(Moments::from_values([3.0]).sample_std().is_none());
    }

    #[test]
    fn test_median() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(Vec::new()), None);
    }

    #[test]
    fn test_mode_tie_breaks_to_smallest() {
        let values = vec![
            Value::Text("b".into()),
            Value::Text("a".into()),
            Value::Text("b".into()),
            Value::Text("a".into()),
            Value::Null,
            Value::Null,
            Value::Null,
        ];
        assert_eq!(mode(&values), Some(Value::Text("a".into())));
    }

    #[test]
    fn test_mode_empty() {
        assert_eq!(mode(&[Value::Null]), None);
    }
}
