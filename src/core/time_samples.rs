//! Time-sampled storage with default-value fallback.

use std::borrow::Cow;

use crate::core::{SampleInterp, TimeCode};
use crate::util::Chrono;

/// A default value plus time samples sorted by time.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSamples<T> {
    default: Option<T>,
    samples: Vec<(Chrono, T)>,
}

impl<T> Default for TimeSamples<T> {
    fn default() -> Self {
        Self {
            default: None,
            samples: Vec::new(),
        }
    }
}

/// What a time query resolved to.
#[derive(Debug)]
pub enum Resolved<'a, T> {
    /// A single authored value.
    Held(&'a T),
    /// Between two samples.
    Between { lower: &'a T, upper: &'a T, alpha: f64 },
}

impl<T> TimeSamples<T> {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage holding only a default value.
    pub fn with_default(value: T) -> Self {
        Self {
            default: Some(value),
            samples: Vec::new(),
        }
    }

    /// Set the default value.
    pub fn set_default(&mut self, value: T) {
        self.default = Some(value);
    }

    /// Set a time sample, replacing any sample at the same time.
    pub fn set(&mut self, time: Chrono, value: T) {
        match self.samples.binary_search_by(|(t, _)| t.total_cmp(&time)) {
            Ok(i) => self.samples[i].1 = value,
            Err(i) => self.samples.insert(i, (time, value)),
        }
    }

    /// The authored default value.
    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    /// Number of time samples (the default is not counted).
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Check if nothing is authored.
    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.samples.is_empty()
    }

    /// Sample times in ascending order.
    pub fn times(&self) -> impl Iterator<Item = Chrono> + '_ {
        self.samples.iter().map(|(t, _)| *t)
    }

    /// Locate the samples bracketing `time`.
    ///
    /// Times outside the sampled range clamp to the first/last sample.
    pub fn bracket(&self, time: Chrono) -> Option<SampleInterp> {
        if self.samples.is_empty() {
            return None;
        }
        let upper = self.samples.partition_point(|(t, _)| *t <= time);
        if upper == 0 {
            return Some(SampleInterp::exact(0));
        }
        if upper == self.samples.len() {
            return Some(SampleInterp::exact(upper - 1));
        }
        let lower = upper - 1;
        let (t0, t1) = (self.samples[lower].0, self.samples[upper].0);
        if t0 == time {
            return Some(SampleInterp::exact(lower));
        }
        Some(SampleInterp::lerp(lower, upper, (time - t0) / (t1 - t0)))
    }

    /// Resolve the value at `time`.
    pub fn resolve(&self, time: TimeCode) -> Option<Resolved<'_, T>> {
        match time {
            TimeCode::Default => self.default.as_ref().map(Resolved::Held),
            TimeCode::EarliestTime => self
                .samples
                .first()
                .map(|(_, v)| v)
                .or(self.default.as_ref())
                .map(Resolved::Held),
            TimeCode::At(t) => {
                let Some(interp) = self.bracket(t) else {
                    return self.default.as_ref().map(Resolved::Held);
                };
                let lower = &self.samples[interp.floor_index].1;
                if interp.is_exact() {
                    Some(Resolved::Held(lower))
                } else {
                    Some(Resolved::Between {
                        lower,
                        upper: &self.samples[interp.ceil_index].1,
                        alpha: interp.alpha,
                    })
                }
            }
        }
    }

    /// Resolve the value at `time`, interpolating with `lerp` between
    /// samples. When `lerp` declines, the lower sample is held.
    pub fn value_at<F>(&self, time: TimeCode, lerp: F) -> Option<Cow<'_, T>>
    where
        T: Clone,
        F: FnOnce(&T, &T, f64) -> Option<T>,
    {
        match self.resolve(time)? {
            Resolved::Held(v) => Some(Cow::Borrowed(v)),
            Resolved::Between { lower, upper, alpha } => Some(
                lerp(lower, upper, alpha)
                    .map(Cow::Owned)
                    .unwrap_or(Cow::Borrowed(lower)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampled() -> TimeSamples<f64> {
        let mut s = TimeSamples::with_default(-1.0);
        s.set(10.0, 10.0);
        s.set(1.0, 1.0);
        s.set(5.0, 5.0);
        s
    }

    fn lerp(a: &f64, b: &f64, t: f64) -> Option<f64> {
        Some(a + (b - a) * t)
    }

    #[test]
    fn test_sorted_insert() {
        let s = sampled();
        assert_eq!(s.times().collect::<Vec<_>>(), vec![1.0, 5.0, 10.0]);
        assert_eq!(s.num_samples(), 3);
    }

    #[test]
    fn test_replace_sample() {
        let mut s = sampled();
        s.set(5.0, 50.0);
        assert_eq!(s.num_samples(), 3);
        assert_eq!(*s.value_at(TimeCode::At(5.0), lerp).unwrap(), 50.0);
    }

    #[test]
    fn test_default_ignores_samples() {
        let s = sampled();
        assert_eq!(*s.value_at(TimeCode::Default, lerp).unwrap(), -1.0);

        let only_samples = {
            let mut s = TimeSamples::new();
            s.set(2.0, 2.0);
            s
        };
        assert!(only_samples.value_at(TimeCode::Default, lerp).is_none());
    }

    #[test]
    fn test_earliest() {
        assert_eq!(*sampled().value_at(TimeCode::EarliestTime, lerp).unwrap(), 1.0);
        let only_default = TimeSamples::with_default(7.0);
        assert_eq!(*only_default.value_at(TimeCode::EarliestTime, lerp).unwrap(), 7.0);
    }

    #[test]
    fn test_at_time() {
        let s = sampled();
        assert_eq!(*s.value_at(TimeCode::At(1.0), lerp).unwrap(), 1.0);
        assert_eq!(*s.value_at(TimeCode::At(3.0), lerp).unwrap(), 3.0);
        // Clamped outside the sampled range.
        assert_eq!(*s.value_at(TimeCode::At(-4.0), lerp).unwrap(), 1.0);
        assert_eq!(*s.value_at(TimeCode::At(99.0), lerp).unwrap(), 10.0);
        // Held when interpolation is declined.
        assert_eq!(*s.value_at(TimeCode::At(3.0), |_, _, _| None).unwrap(), 1.0);
    }

    #[test]
    fn test_at_time_without_samples() {
        let s = TimeSamples::with_default(4.0);
        assert_eq!(*s.value_at(TimeCode::At(100.0), lerp).unwrap(), 4.0);
        assert!(TimeSamples::<f64>::new().value_at(TimeCode::At(0.0), lerp).is_none());
    }
}
