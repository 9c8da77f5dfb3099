//! Discounted Monte-Carlo returns.

/// `G_t = r_t + gamma * G_{t+1}` for every step, in chronological order.
#[must_use]
pub fn discounted_returns(rewards: &[f32], gamma: f32) -> Vec<f32> {
    let mut returns = Vec::with_capacity(rewards.len());
    let mut running = 0.0f32;
    for &r in rewards.iter().rev() {
        running = r + gamma * running;
        returns.push(running);
    }
    returns.reverse();
    returns
}

/// Rescales `returns` to zero mean and unit (sample) standard deviation.
///
/// The statistics come from the whole episode. With fewer than two values,
/// or when every value is the same, there is no spread to divide by and the
/// returns come back unchanged.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn normalize_returns(returns: &[f32]) -> Vec<f32> {
    let n = returns.len();
    if n < 2 {
        tracing::debug!(steps = n, "episode too short to normalize returns, using raw returns");
        return returns.to_vec();
    }
    let mean = returns.iter().sum::<f32>() / n as f32;
    let var = returns.iter().map(|g| (g - mean).powi(2)).sum::<f32>() / (n - 1) as f32;
    let std = var.sqrt();
    if std.is_nan() || std <= f32::EPSILON {
        tracing::debug!(steps = n, std, "returns have no spread, using raw returns");
        return returns.to_vec();
    }
    returns.iter().map(|g| (g - mean) / std).collect()
}

/// Discounted returns for one episode, normalized over the episode.
#[must_use]
pub fn compute_returns(rewards: &[f32], gamma: f32) -> Vec<f32> {
    normalize_returns(&discounted_returns(rewards, gamma))
}
