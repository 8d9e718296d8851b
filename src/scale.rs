use crate::ir::{AxisValues, Scale};

impl Scale {
    /// Continuous scale over the values, padded by 5% on each side.
    /// With `include_zero` the domain always spans 0 (bar charts).
    pub fn continuous(values: &[f64], include_zero: bool) -> Self {
        let mut min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        // Handle empty case
        if min == f64::INFINITY {
            min = 0.0;
            max = 1.0;
        }

        let (mut lo, mut hi) = pad_range(min, max);
        if include_zero {
            // Bars grow from the axis, so no padding below zero
            if min >= 0.0 {
                lo = 0.0;
            }
            if max <= 0.0 {
                hi = 0.0;
            }
        }

        Scale {
            domain: (lo, hi),
            is_categorical: false,
            categories: Vec::new(),
            reversed: false,
        }
    }

    /// One slot per category at integer positions, half a slot of margin
    pub fn categorical(categories: Vec<String>, reversed: bool) -> Self {
        let n = categories.len().max(1) as f64;
        Scale {
            domain: (-0.5, n - 0.5),
            is_categorical: true,
            categories,
            reversed,
        }
    }

    /// Scale for an axis that may hold either kind of values.
    /// Repeated categories share a slot, in order of first appearance.
    pub fn for_axis(values: &AxisValues, reversed: bool) -> Self {
        match values {
            AxisValues::Continuous(v) => Scale::continuous(v, false),
            AxisValues::Categorical(v) => Scale::categorical(unique_in_order(v), reversed),
        }
    }

    /// Coordinate of the `idx`-th category
    pub fn slot(&self, idx: usize) -> f64 {
        if self.reversed {
            let last = self.categories.len().saturating_sub(1);
            (last - idx.min(last)) as f64
        } else {
            idx as f64
        }
    }

    /// Coordinate of a category label, if it belongs to this scale
    pub fn slot_of(&self, label: &str) -> Option<f64> {
        self.categories.iter().position(|c| c == label).map(|idx| self.slot(idx))
    }

    /// Inverse of `slot` used by axis tick formatting
    pub fn label_at(&self, coord: f64) -> String {
        let rounded = coord.round();
        if (coord - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        let pos = rounded as usize;
        if pos >= self.categories.len() {
            return String::new();
        }
        let idx = if self.reversed {
            self.categories.len() - 1 - pos
        } else {
            pos
        };
        self.categories[idx].clone()
    }
}

pub fn unique_in_order(values: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for v in values {
        if !seen.contains(v) {
            seen.push(v.clone());
        }
    }
    seen
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_continuous() {
        let scale = Scale::continuous(&[0.0, 10.0], false);
        // Check padding
        assert!(scale.domain.0 < 0.0);
        assert!(scale.domain.1 > 10.0);
        assert!(!scale.is_categorical);
    }

    #[test]
    fn test_scale_single_point() {
        let scale = Scale::continuous(&[5.0], false);
        assert_eq!(scale.domain, (4.0, 6.0));
    }

    #[test]
    fn test_scale_include_zero() {
        let scale = Scale::continuous(&[50.0, 100.0], true);
        assert_eq!(scale.domain.0, 0.0);
        assert!(scale.domain.1 > 100.0);

        let negative = Scale::continuous(&[-5.0, -1.0], true);
        assert_eq!(negative.domain.1, 0.0);
    }

    #[test]
    fn test_scale_categorical() {
        let scale = Scale::categorical(vec!["A".to_string(), "B".to_string()], false);
        assert!(scale.is_categorical);
        assert_eq!(scale.domain, (-0.5, 1.5));
        assert_eq!(scale.slot(1), 1.0);
        assert_eq!(scale.label_at(0.0), "A");
        assert_eq!(scale.label_at(0.5), "");
        assert_eq!(scale.label_at(7.0), "");
    }

    #[test]
    fn test_scale_categorical_reversed() {
        let cats = vec!["US".to_string(), "FR".to_string(), "JP".to_string()];
        let scale = Scale::categorical(cats, true);
        assert_eq!(scale.slot(0), 2.0);
        assert_eq!(scale.slot(2), 0.0);
        assert_eq!(scale.label_at(2.0), "US");
        assert_eq!(scale.slot_of("FR"), Some(1.0));
        assert_eq!(scale.slot_of("DE"), None);
    }

    #[test]
    fn test_for_axis_dedups_categories() {
        let values = AxisValues::Categorical(vec!["a".into(), "b".into(), "a".into()]);
        let scale = Scale::for_axis(&values, false);
        assert_eq!(scale.categories, vec!["a", "b"]);
    }
}
