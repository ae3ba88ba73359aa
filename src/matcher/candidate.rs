//! A pairing of two intervals that share at least one position.

use omics::coordinate::position::Number;

use crate::annotation::GenomicInterval;

/// Computes the number of positions shared by two fully-closed intervals.
///
/// Only coordinates are considered; callers are responsible for checking that
/// both intervals sit on the same sequence and strand.
///
/// # Examples
///
/// ```
/// use genebridge::annotation::GenomicInterval;
/// use genebridge::matcher::overlap_length;
/// use omics::coordinate::Strand;
///
/// let a = GenomicInterval::try_new("chr1", 100, 200, Strand::Positive, "g1")?;
/// let b = GenomicInterval::try_new("chr1", 150, 210, Strand::Positive, "h1")?;
/// let c = GenomicInterval::try_new("chr1", 201, 300, Strand::Positive, "h2")?;
///
/// assert_eq!(overlap_length(&a, &b), 51);
/// assert_eq!(overlap_length(&a, &c), 0);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn overlap_length(a: &GenomicInterval, b: &GenomicInterval) -> Number {
    let start = a.start().max(b.start());
    let end = a.end().min(b.end());

    match end >= start {
        true => end - start + 1,
        false => 0,
    }
}

/// Computes the overlap as a fraction of the shorter interval's length.
///
/// The value is symmetric in `a` and `b`.
pub fn overlap_fraction(a: &GenomicInterval, b: &GenomicInterval) -> f64 {
    let shorter = a.len().min(b.len());
    overlap_length(a, b) as f64 / shorter as f64
}

/// A candidate counterpart in annotation B for an interval in annotation A.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlapCandidate<'a> {
    /// The interval from annotation A.
    a: &'a GenomicInterval,

    /// The interval from annotation B.
    b: &'a GenomicInterval,

    /// The number of shared positions.
    overlap_length: Number,

    /// The length of the shorter of the two intervals.
    shorter_length: Number,
}

impl<'a> OverlapCandidate<'a> {
    /// Creates a new candidate from two intervals.
    pub fn new(a: &'a GenomicInterval, b: &'a GenomicInterval) -> Self {
        Self {
            a,
            b,
            overlap_length: overlap_length(a, b),
            shorter_length: a.len().min(b.len()),
        }
    }

    /// Gets the interval from annotation A.
    pub fn a(&self) -> &'a GenomicInterval {
        self.a
    }

    /// Gets the interval from annotation B.
    pub fn b(&self) -> &'a GenomicInterval {
        self.b
    }

    /// Gets the number of shared positions.
    pub fn overlap_length(&self) -> Number {
        self.overlap_length
    }

    /// Gets the length of the shorter interval.
    pub fn shorter_length(&self) -> Number {
        self.shorter_length
    }

    /// Gets the overlap as a fraction of the shorter interval's length.
    pub fn overlap_fraction(&self) -> f64 {
        self.overlap_length as f64 / self.shorter_length as f64
    }

    /// Gets the absolute difference between the two interval lengths.
    pub fn length_difference(&self) -> Number {
        self.a.len().abs_diff(self.b.len())
    }

    /// Orders two candidates for the same A interval by preference.
    ///
    /// [`Ordering::Greater`](std::cmp::Ordering::Greater) means `self` is
    /// preferred: a longer overlap wins, then the B interval whose length is
    /// closest to the A interval's length, then the lexicographically smaller
    /// B locus tag.
    pub fn preference(&self, other: &Self) -> std::cmp::Ordering {
        self.overlap_length
            .cmp(&other.overlap_length)
            .then_with(|| other.length_difference().cmp(&self.length_difference()))
            .then_with(|| other.b.locus_tag().cmp(self.b.locus_tag()))
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use omics::coordinate::Strand;

    use super::*;

    fn interval(start: Number, end: Number, tag: &str) -> GenomicInterval {
        GenomicInterval::try_new("chr1", start, end, Strand::Positive, tag).unwrap()
    }

    #[test]
    fn test_overlap_fraction_is_symmetric() {
        let pairs = [
            (interval(100, 200, "a"), interval(150, 210, "b")),
            (interval(1, 10, "a"), interval(1, 1000, "b")),
            (interval(50, 60, "a"), interval(61, 70, "b")),
            (interval(5, 5, "a"), interval(5, 5, "b")),
        ];

        for (a, b) in &pairs {
            assert_eq!(overlap_fraction(a, b), overlap_fraction(b, a));
            assert_eq!(
                OverlapCandidate::new(a, b).overlap_fraction(),
                OverlapCandidate::new(b, a).overlap_fraction()
            );
        }
    }

    #[test]
    fn test_containment_is_full_overlap() {
        let a = interval(1, 10, "a");
        let b = interval(1, 1000, "b");
        assert_eq!(overlap_fraction(&a, &b), 1.0);
    }

    #[test]
    fn test_adjacent_intervals_do_not_overlap() {
        let a = interval(50, 60, "a");
        let b = interval(61, 70, "b");
        assert_eq!(overlap_length(&a, &b), 0);
        assert_eq!(overlap_fraction(&a, &b), 0.0);
    }

    #[test]
    fn test_preference_tie_breaks() {
        let a = interval(100, 199, "a");

        // Same overlap (100), but `near` is closer in length to `a`.
        let near = interval(100, 210, "z");
        let far = interval(90, 300, "b");
        let near = OverlapCandidate::new(&a, &near);
        let far = OverlapCandidate::new(&a, &far);
        assert_eq!(near.preference(&far), Ordering::Greater);

        // Fully tied apart from the locus tag: the smaller tag wins.
        let first = interval(100, 199, "h1");
        let second = interval(100, 199, "h2");
        let first = OverlapCandidate::new(&a, &first);
        let second = OverlapCandidate::new(&a, &second);
        assert_eq!(first.preference(&second), Ordering::Greater);
        assert_eq!(second.preference(&first), Ordering::Less);
    }
}
