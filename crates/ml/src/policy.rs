use crate::distribution::Categorical;
use crate::error::MlError;
use crate::graph::Graph;
use crate::nn::Dense;
use crate::recorder::Recorder;
use crate::tensor::Tensor;
use std::collections::HashMap;

/// Shared trunk with a policy head and a value head.
///
/// `obs → Dense → ReLU → { Dense → action logits, Dense → state value }`.
/// Neither head has an output activation.
#[derive(Clone, Debug)]
pub struct PolicyValueNet {
    pub trunk: Dense,
    pub policy_head: Dense,
    pub value_head: Dense,
}

impl PolicyValueNet {
    pub fn new(obs_dim: usize, hidden_dim: usize, n_actions: usize, rng: &mut fastrand::Rng) -> Self {
        Self {
            trunk: Dense::random(obs_dim, hidden_dim, rng),
            policy_head: Dense::random(hidden_dim, n_actions, rng),
            value_head: Dense::random(hidden_dim, 1, rng),
        }
    }

    pub fn obs_dim(&self) -> usize {
        self.trunk.in_dim
    }

    pub fn n_actions(&self) -> usize {
        self.policy_head.out_dim
    }

    /// Batched forward pass on a `[batch, obs_dim]` input.
    ///
    /// Returns `([batch, n_actions]` logits, `[batch, 1]` values).
    pub fn forward(
        &self,
        x: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> (Tensor, Tensor) {
        let h = self.trunk.forward(x, recorder, tensors);
        let h = h.relu(recorder, tensors);
        let logits = self.policy_head.forward(&h, recorder, tensors);
        let value = self.value_head.forward(&h, recorder, tensors);
        (logits, value)
    }

    /// Action distribution and value estimate for one observation.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::ObservationShape`] if `obs` is not `obs_dim` long.
    pub fn evaluate(&self, obs: &[f32]) -> Result<(Categorical, f32), MlError> {
        if obs.len() != self.obs_dim() {
            return Err(MlError::ObservationShape { expected: self.obs_dim(), got: obs.len() });
        }
        let x = Tensor::from_vec(vec![1, obs.len()], obs.to_vec());
        let mut tensors = HashMap::new();
        let (logits, value) = self.forward(&x, &mut Graph::new(), &mut tensors);
        Ok((Categorical::from_logits(logits.data()), value.data()[0]))
    }

    /// Inserts the parameters into `tensors` with gradients enabled.
    pub fn register(&self, tensors: &mut HashMap<usize, Tensor>) {
        for p in self.params() {
            tensors.insert(p.id, p.clone().with_grad());
        }
    }

    /// Copies the gradients a tape wrote into `tensors` onto the parameters.
    pub fn collect_grads(&mut self, tensors: &HashMap<usize, Tensor>) {
        for p in self.params_mut() {
            p.grad = tensors.get(&p.id).and_then(|t| t.grad.clone());
        }
    }

    pub fn zero_grad(&mut self) {
        for p in self.params_mut() {
            p.grad = None;
        }
    }

    /// Trunk, policy head and value head parameters, weights before biases.
    pub fn params(&self) -> Vec<&Tensor> {
        let mut out = Vec::with_capacity(6);
        out.extend(self.trunk.params());
        out.extend(self.policy_head.params());
        out.extend(self.value_head.params());
        out
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        let mut out = Vec::with_capacity(6);
        out.extend(self.trunk.params_mut());
        out.extend(self.policy_head.params_mut());
        out.extend(self.value_head.params_mut());
        out
    }
}
