use std::collections::VecDeque;

/// Every episode score, plus a sliding window over the most recent ones.
#[derive(Clone, Debug)]
pub struct ScoreHistory {
    all: Vec<f32>,
    window: VecDeque<f32>,
    capacity: usize,
}

impl ScoreHistory {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "score window needs room for one episode");
        Self { all: Vec::new(), window: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, score: f32) {
        self.all.push(score);
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(score);
    }

    /// Mean of the last `min(capacity, len())` scores, `None` before the first.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rolling_average(&self) -> Option<f32> {
        if self.window.is_empty() {
            return None;
        }
        Some(self.window.iter().sum::<f32>() / self.window.len() as f32)
    }

    /// The window holds `capacity` scores.
    #[must_use]
    pub fn window_full(&self) -> bool {
        self.window.len() == self.capacity
    }

    #[must_use]
    pub fn all(&self) -> &[f32] {
        &self.all
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
