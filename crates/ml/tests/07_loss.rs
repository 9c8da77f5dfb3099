use ml::reinforce::assemble_loss;
use ml::tape::Tape;
use ml::*;
use std::collections::HashMap;

fn net() -> PolicyValueNet {
    PolicyValueNet::new(3, 6, 2, &mut fastrand::Rng::with_seed(17))
}

fn trajectory() -> Trajectory {
    let observations = vec![vec![0.2, -0.1, 0.5], vec![0.4, 0.3, -0.2], vec![-0.6, 0.1, 0.0]];
    let rewards = vec![1.0, -0.5, 2.0];
    Trajectory {
        observations,
        actions: vec![1, 0, 1],
        log_probs: vec![0.0; 3],
        values: vec![0.0; 3],
        score: rewards.iter().sum(),
        rewards,
    }
}

const RETURNS: [f32; 3] = [0.8, -1.1, 0.3];

/// (policy, value) loss for `net` without touching any gradients.
fn losses(net: &PolicyValueNet) -> (f32, f32) {
    let mut tensors = HashMap::new();
    let loss = assemble_loss(net, &trajectory(), &RETURNS, &mut Tape::new(), &mut tensors).unwrap();
    (loss.policy.data()[0], loss.value.data()[0])
}

fn grads_of(net: &mut PolicyValueNet, pick: impl Fn(&reinforce::EpisodeLoss) -> &Tensor) {
    let mut tape = Tape::new();
    let mut tensors = HashMap::new();
    net.register(&mut tensors);
    let loss = assemble_loss(net, &trajectory(), &RETURNS, &mut tape, &mut tensors).unwrap();
    tape.backward(pick(&loss), &mut tensors).unwrap();
    net.collect_grads(&tensors);
}

#[test]
fn losses_match_their_definitions() {
    let net = net();
    let traj = trajectory();
    let (policy, value) = losses(&net);

    let mut expected_policy = 0.0;
    let mut expected_value = 0.0;
    for ((obs, &action), g) in traj.observations.iter().zip(&traj.actions).zip(RETURNS) {
        let (dist, v) = net.evaluate(obs).unwrap();
        expected_policy -= dist.log_prob(action) * (g - v);
        expected_value += 0.5 * (g - v).powi(2);
    }
    assert!((policy - expected_policy).abs() < 1e-4, "{policy} vs {expected_policy}");
    assert!((value - expected_value).abs() < 1e-4, "{value} vs {expected_value}");

    let mut tensors = HashMap::new();
    let loss = assemble_loss(&net, &traj, &RETURNS, &mut Tape::new(), &mut tensors).unwrap();
    assert!((loss.total.data()[0] - (policy + value)).abs() < 1e-5);
}

#[test]
fn policy_loss_does_not_reach_the_value_head() {
    let mut net = net();
    grads_of(&mut net, |l| &l.policy);

    assert!(net.value_head.w.grad.is_none());
    assert!(net.value_head.b.grad.is_none());
    let policy_grad = net.policy_head.w.grad.as_ref().expect("policy head gradient");
    assert!(policy_grad.iter().any(|g| *g != 0.0));
    assert!(net.trunk.w.grad.is_some());
}

#[test]
fn value_loss_does_not_reach_the_policy_head() {
    let mut net = net();
    grads_of(&mut net, |l| &l.value);

    assert!(net.policy_head.w.grad.is_none());
    assert!(net.value_head.w.grad.is_some());
    assert!(net.trunk.w.grad.is_some());
}

#[test]
fn composite_gradient_splits_per_head() {
    let mut net = net();
    grads_of(&mut net, |l| &l.total);
    let eps = 1e-3;

    // Value head: only the value term, the baseline in the policy term is constant.
    let value_grad = net.value_head.w.grad.clone().unwrap();
    for (i, &analytical) in value_grad.iter().enumerate() {
        let mut plus = net.clone();
        let mut minus = net.clone();
        plus.value_head.w.data[i] += eps;
        minus.value_head.w.data[i] -= eps;
        let numerical = (losses(&plus).1 - losses(&minus).1) / (2.0 * eps);
        assert!((numerical - analytical).abs() < 1e-2, "value w[{i}]: {numerical} vs {analytical}");
    }

    // Policy head: only the policy term.
    let policy_grad = net.policy_head.w.grad.clone().unwrap();
    for (i, &analytical) in policy_grad.iter().enumerate() {
        let mut plus = net.clone();
        let mut minus = net.clone();
        plus.policy_head.w.data[i] += eps;
        minus.policy_head.w.data[i] -= eps;
        let numerical = (losses(&plus).0 - losses(&minus).0) / (2.0 * eps);
        assert!((numerical - analytical).abs() < 1e-2, "policy w[{i}]: {numerical} vs {analytical}");
    }
}

#[test]
fn bad_trajectories_are_rejected() {
    let net = net();
    let mut tensors = HashMap::new();
    let mut tape = Tape::new();

    let empty = Trajectory::default();
    let err = assemble_loss(&net, &empty, &[], &mut tape, &mut tensors).unwrap_err();
    assert!(matches!(err, MlError::EmptyTrajectory));

    let err = assemble_loss(&net, &trajectory(), &RETURNS[..2], &mut tape, &mut tensors).unwrap_err();
    assert!(matches!(err, MlError::LengthMismatch(_)));

    let mut ragged = trajectory();
    ragged.values.pop();
    let err = assemble_loss(&net, &ragged, &RETURNS, &mut tape, &mut tensors).unwrap_err();
    assert!(matches!(err, MlError::LengthMismatch(_)));

    let mut bad_action = trajectory();
    bad_action.actions[2] = 2;
    let err = assemble_loss(&net, &bad_action, &RETURNS, &mut tape, &mut tensors).unwrap_err();
    assert!(matches!(err, MlError::InvalidAction { action: 2, size: 2 }));

    let mut bad_obs = trajectory();
    bad_obs.observations[0].push(1.0);
    let err = assemble_loss(&net, &bad_obs, &RETURNS, &mut tape, &mut tensors).unwrap_err();
    assert!(matches!(err, MlError::ObservationShape { expected: 3, got: 4 }));
}
