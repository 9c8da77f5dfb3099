use crate::tensor::log_softmax_row;

/// A categorical distribution over `0..len()` built from unnormalized logits.
#[derive(Clone, Debug, PartialEq)]
pub struct Categorical {
    log_probs: Vec<f32>,
}

impl Categorical {
    /// # Panics
    ///
    /// Panics if `logits` is empty.
    #[must_use]
    pub fn from_logits(logits: &[f32]) -> Self {
        assert!(!logits.is_empty(), "categorical needs at least one outcome");
        Self { log_probs: log_softmax_row(logits) }
    }

    /// Number of outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log_probs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log_probs.is_empty()
    }

    #[must_use]
    pub fn log_probs(&self) -> &[f32] {
        &self.log_probs
    }

    #[must_use]
    pub fn probs(&self) -> Vec<f32> {
        self.log_probs.iter().map(|lp| lp.exp()).collect()
    }

    /// Log-likelihood of `action`; `-inf` outside the support.
    #[must_use]
    pub fn log_prob(&self, action: usize) -> f32 {
        self.log_probs.get(action).copied().unwrap_or(f32::NEG_INFINITY)
    }

    /// Draws an outcome by inverting the cumulative distribution.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> usize {
        let u = rng.f32();
        let mut cumulative = 0.0;
        for (action, lp) in self.log_probs.iter().enumerate() {
            cumulative += lp.exp();
            if u < cumulative {
                return action;
            }
        }
        // Rounding left the total just under 1.
        self.len() - 1
    }

    /// Most likely outcome; ties go to the lowest index.
    #[must_use]
    pub fn mode(&self) -> usize {
        let mut best = 0;
        for (action, &lp) in self.log_probs.iter().enumerate() {
            if lp > self.log_probs[best] {
                best = action;
            }
        }
        best
    }

    #[must_use]
    pub fn entropy(&self) -> f32 {
        -self.log_probs.iter().map(|&lp| lp.exp() * lp).sum::<f32>()
    }
}
