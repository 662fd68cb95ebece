use rand::Rng;

/// A finite set of actions `{0, 1, ..., n - 1}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discrete {
    pub n: usize,
}

impl Discrete {
    /// **Panics** if `n` is zero
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "A discrete space must contain at least one element.");
        Self { n }
    }

    pub fn contains(&self, x: usize) -> bool {
        x < self.n
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.n)
    }
}

/// A box in `R^n` with per-component bounds
///
/// The bounds are a declared contract. Raw observations may exceed them, so
/// consumers that need them enforced should check [`contains`](BoxSpace::contains).
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpace {
    pub low: Vec<f64>,
    pub high: Vec<f64>,
}

impl BoxSpace {
    /// A box of `shape` components with the same bounds on every component
    ///
    /// **Panics** if `low > high`
    pub fn uniform(low: f64, high: f64, shape: usize) -> Self {
        assert!(low <= high, "Box lower bound must not exceed upper bound.");
        Self {
            low: vec![low; shape],
            high: vec![high; shape],
        }
    }

    pub fn shape(&self) -> usize {
        self.low.len()
    }

    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.shape()
            && x
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(v, (lo, hi))| v >= lo && v <= hi)
    }
}
