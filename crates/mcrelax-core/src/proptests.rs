//! Property-based tests for static interval arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::Interval;

    // An interval together with a point inside it.
    fn interval_with_point() -> impl Strategy<Value = (Interval, f64)> {
        (-50.0f64..50.0, 0.0f64..20.0, 0.0f64..=1.0).prop_map(|(lo, width, t)| {
            let interval = Interval::new(lo, lo + width);
            let x = (lo + t * width).clamp(interval.lo(), interval.hi());
            (interval, x)
        })
    }

    fn widened(interval: Interval, value: f64) -> bool {
        let slack = 1e-9 * (1.0 + value.abs());
        interval.lo() - slack <= value && value <= interval.hi() + slack
    }

    proptest! {
        #[test]
        fn add_encloses((x, a) in interval_with_point(), (y, b) in interval_with_point()) {
            prop_assert!(widened(x.add(&y), a + b));
        }

        #[test]
        fn sub_encloses((x, a) in interval_with_point(), (y, b) in interval_with_point()) {
            prop_assert!(widened(x.sub(&y), a - b));
        }

        #[test]
        fn mul_encloses((x, a) in interval_with_point(), (y, b) in interval_with_point()) {
            prop_assert!(widened(x.mul(&y), a * b));
        }

        #[test]
        fn sqr_encloses((x, a) in interval_with_point()) {
            prop_assert!(widened(x.sqr(), a * a));
        }

        #[test]
        fn recip_encloses((x, a) in interval_with_point()) {
            if let Some(r) = x.recip() {
                prop_assert!(widened(r, a.recip()));
            } else {
                prop_assert!(x.contains_zero());
            }
        }

        #[test]
        fn hull_encloses_both((x, _) in interval_with_point(), (y, _) in interval_with_point()) {
            let h = x.hull(&y);
            prop_assert!(h.encloses(&x) && h.encloses(&y));
        }
    }
}
