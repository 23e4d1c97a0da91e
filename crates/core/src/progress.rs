//! Completion percentage derived from deliverable weights.
//!
//! The same rule drives phase progress (deliverables of one phase) and
//! project progress (all deliverables of a project).

/// The inputs of one deliverable that matter for progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliverableWeight {
    /// Relative contribution, 0-100. Negative values are treated as zero.
    pub weight: f64,
    /// Whether the deliverable's status is `validated`.
    pub validated: bool,
}

impl DeliverableWeight {
    pub fn new(weight: f64, validated: bool) -> Self {
        Self { weight, validated }
    }
}

/// Weight-adjusted share of validated deliverables, as an integer percentage.
///
/// - Weights summing to `W > 0`: `round(100 * validated_weight / W)`.
/// - Deliverables present but every weight zero: `round(100 * validated / count)`.
/// - No deliverables: `0`.
///
/// The result is always within `0..=100`.
pub fn weighted_progress(deliverables: &[DeliverableWeight]) -> i32 {
    if deliverables.is_empty() {
        return 0;
    }

    let (total, validated) = deliverables.iter().fold((0.0_f64, 0.0_f64), |(t, v), d| {
        let w = d.weight.max(0.0);
        (t + w, if d.validated { v + w } else { v })
    });

    let pct = if total > 0.0 {
        100.0 * validated / total
    } else {
        let done = deliverables.iter().filter(|d| d.validated).count();
        100.0 * done as f64 / deliverables.len() as f64
    };

    (pct.round() as i32).clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(weight: f64, validated: bool) -> DeliverableWeight {
        DeliverableWeight::new(weight, validated)
    }

    #[test]
    fn no_deliverables_is_zero() {
        assert_eq!(weighted_progress(&[]), 0);
    }

    #[test]
    fn half_of_equal_weights_is_fifty() {
        assert_eq!(weighted_progress(&[d(50.0, true), d(50.0, false)]), 50);
    }

    #[test]
    fn uneven_weights_are_proportional() {
        assert_eq!(weighted_progress(&[d(30.0, true), d(10.0, false)]), 75);
        assert_eq!(weighted_progress(&[d(1.0, true), d(2.0, false)]), 33);
        assert_eq!(weighted_progress(&[d(2.0, true), d(1.0, false)]), 67);
    }

    #[test]
    fn all_zero_weights_fall_back_to_count() {
        let items = [d(0.0, true), d(0.0, false), d(0.0, false), d(0.0, false)];
        assert_eq!(weighted_progress(&items), 25);
    }

    #[test]
    fn zero_weight_validated_item_does_not_count_when_others_weigh() {
        assert_eq!(weighted_progress(&[d(0.0, true), d(40.0, false)]), 0);
    }

    #[test]
    fn everything_validated_is_one_hundred() {
        assert_eq!(weighted_progress(&[d(70.0, true), d(100.0, true)]), 100);
    }

    #[test]
    fn negative_weights_are_ignored() {
        assert_eq!(weighted_progress(&[d(-50.0, true), d(50.0, true)]), 100);
        assert_eq!(weighted_progress(&[d(-10.0, false), d(10.0, true)]), 100);
    }
}
