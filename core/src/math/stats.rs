pub struct StatsHelper;

impl StatsHelper {
    /// Minimum and maximum of the finite values, `None` when there are none.
    pub fn extent<I>(values: I) -> Option<(f64, f64)>
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Position of `value` inside `[min, max]`, mapped to `[0, 1]`.
    /// A degenerate span maps everything to the middle.
    pub fn unit_position(value: f64, min: f64, max: f64) -> f64 {
        let span = max - min;
        if span <= f64::EPSILON {
            return 0.5;
        }
        ((value - min) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_of_empty_sequence_is_none() {
        assert_eq!(StatsHelper::extent(Vec::new()), None);
        assert_eq!(StatsHelper::extent(vec![f64::NAN]), None);
    }

    #[test]
    fn extent_handles_single_value() {
        assert_eq!(StatsHelper::extent(vec![4.0]), Some((4.0, 4.0)));
    }

    #[test]
    fn unit_position_survives_degenerate_span() {
        assert_eq!(StatsHelper::unit_position(3.0, 3.0, 3.0), 0.5);
        assert_eq!(StatsHelper::unit_position(5.0, 0.0, 10.0), 0.5);
        assert_eq!(StatsHelper::unit_position(-1.0, 0.0, 10.0), 0.0);
    }
}
