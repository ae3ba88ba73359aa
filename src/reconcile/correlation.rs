//! Pearson correlation of paired effect sizes.

/// The minimum number of pairs needed for a correlation.
const MIN_PAIRS: usize = 2;

/// The outcome of correlating paired effect sizes.
///
/// A correlation that cannot be computed is reported as such rather than as
/// zero or `NaN`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Correlation {
    /// A defined coefficient within `[-1, 1]`.
    Defined(f64),

    /// Fewer than two pairs were available.
    InsufficientData {
        /// The number of pairs that were available.
        pairs: usize,
    },

    /// At least one side had no variance.
    ZeroVariance,

    /// At least one value was infinite or `NaN`.
    NonFinite,
}

impl Correlation {
    /// Gets the coefficient, if it is defined.
    pub fn coefficient(&self) -> Option<f64> {
        match self {
            Correlation::Defined(r) => Some(*r),
            _ => None,
        }
    }
}

impl std::fmt::Display for Correlation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Correlation::Defined(r) => write!(f, "{r:.3}"),
            Correlation::InsufficientData { pairs } => {
                write!(f, "insufficient data ({pairs} pairs)")
            }
            Correlation::ZeroVariance => write!(f, "undefined (zero variance)"),
            Correlation::NonFinite => write!(f, "undefined (non-finite values)"),
        }
    }
}

/// Gets the largest magnitude among `values`.
fn max_magnitude(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |max, value| max.max(value.abs()))
}

/// Computes the Pearson correlation coefficient of paired values.
///
/// Each side is divided by its largest magnitude before any sums are taken,
/// so effect sizes of any finite size cannot overflow the accumulators.
///
/// # Examples
///
/// ```
/// use genebridge::reconcile::correlation::pearson;
/// use genebridge::reconcile::Correlation;
///
/// let r = pearson(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).coefficient().unwrap();
/// assert!((r - 1.0).abs() < 1e-12);
///
/// assert_eq!(
///     pearson(&[(1.0, 2.0)]),
///     Correlation::InsufficientData { pairs: 1 }
/// );
/// assert_eq!(pearson(&[(1.0, 2.0), (1.0, 3.0)]), Correlation::ZeroVariance);
/// assert_eq!(pearson(&[(1.0, 2.0), (f64::NAN, 3.0)]), Correlation::NonFinite);
/// ```
pub fn pearson(pairs: &[(f64, f64)]) -> Correlation {
    if pairs.len() < MIN_PAIRS {
        return Correlation::InsufficientData { pairs: pairs.len() };
    }

    if pairs.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Correlation::NonFinite;
    }

    let scale_x = max_magnitude(pairs.iter().map(|(x, _)| *x));
    let scale_y = max_magnitude(pairs.iter().map(|(_, y)| *y));

    if scale_x == 0.0 || scale_y == 0.0 {
        return Correlation::ZeroVariance;
    }

    let scaled = pairs
        .iter()
        .map(|(x, y)| (x / scale_x, y / scale_y))
        .collect::<Vec<_>>();

    let n = scaled.len() as f64;
    let (sum_x, sum_y) = scaled
        .iter()
        .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
    let (mean_x, mean_y) = (sum_x / n, sum_y / n);

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;

    for (x, y) in &scaled {
        let dx = x - mean_x;
        let dy = y - mean_y;

        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x == 0.0 || variance_y == 0.0 {
        return Correlation::ZeroVariance;
    }

    let r = covariance / (variance_x.sqrt() * variance_y.sqrt());

    if !r.is_finite() {
        return Correlation::NonFinite;
    }

    Correlation::Defined(r.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negated_values() {
        let r = pearson(&[(2.0, -2.0), (0.1, -0.1)]).coefficient().unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(pearson(&[]), Correlation::InsufficientData { pairs: 0 });
        assert_eq!(pearson(&[]).coefficient(), None);
    }

    #[test]
    fn test_uncorrelated_values() {
        let r = pearson(&[(1.0, 1.0), (2.0, -1.0), (3.0, -1.0), (4.0, 1.0)])
            .coefficient()
            .unwrap();
        assert!(r.abs() < 1e-12);
    }

    #[test]
    fn test_large_effects() {
        let r = pearson(&[(1e200, 1e200), (-1e200, -1e200)])
            .coefficient()
            .unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        let r = pearson(&[(1e200, 1.0), (-1e200, 2.0), (5e199, 3.0)])
            .coefficient()
            .unwrap();
        assert!((r + 0.240192).abs() < 1e-6);

        let r = pearson(&[(f64::MAX, -f64::MAX), (-f64::MAX, f64::MAX), (0.0, 0.0)])
            .coefficient()
            .unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_values() {
        assert_eq!(
            pearson(&[(1.0, 2.0), (f64::INFINITY, 3.0), (2.0, 1.0)]),
            Correlation::NonFinite
        );
        assert_eq!(Correlation::NonFinite.coefficient(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Correlation::Defined(-1.0).to_string(), "-1.000");
        assert_eq!(
            Correlation::InsufficientData { pairs: 1 }.to_string(),
            "insufficient data (1 pairs)"
        );
    }
}
