use ml::Categorical;

#[test]
fn cardinality_matches_logits() {
    let dist = Categorical::from_logits(&[0.1, -0.4, 2.0, 0.0]);
    assert_eq!(dist.len(), 4);
    let total: f32 = dist.probs().iter().sum();
    assert!((total - 1.0).abs() < 1e-5);
}

#[test]
fn log_prob_is_log_softmax() {
    let logits = [1.0f32, 2.0, 3.0];
    let dist = Categorical::from_logits(&logits);
    let norm: f32 = logits.iter().map(|l| l.exp()).sum();
    for (a, l) in logits.iter().enumerate() {
        let expected = (l.exp() / norm).ln();
        assert!((dist.log_prob(a) - expected).abs() < 1e-5);
    }
    assert_eq!(dist.log_prob(3), f32::NEG_INFINITY);
}

#[test]
fn sampling_follows_probabilities() {
    let dist = Categorical::from_logits(&[0.0, 1.0, 2.0]);
    let probs = dist.probs();
    let mut rng = fastrand::Rng::with_seed(42);
    let draws = 20_000;
    let mut counts = [0usize; 3];
    for _ in 0..draws {
        let a = dist.sample(&mut rng);
        assert!(a < 3);
        counts[a] += 1;
    }
    for (count, p) in counts.iter().zip(&probs) {
        let freq = *count as f32 / draws as f32;
        assert!((freq - p).abs() < 0.02, "frequency {freq} vs probability {p}");
    }
}

#[test]
fn sampling_is_reproducible_with_a_seed() {
    let dist = Categorical::from_logits(&[0.3, 0.3, 0.4, -1.0]);
    let draw = |seed| {
        let mut rng = fastrand::Rng::with_seed(seed);
        (0..50).map(|_| dist.sample(&mut rng)).collect::<Vec<_>>()
    };
    assert_eq!(draw(9), draw(9));
}

#[test]
fn mode_and_entropy() {
    let peaked = Categorical::from_logits(&[0.0, 5.0, 1.0]);
    assert_eq!(peaked.mode(), 1);

    let uniform = Categorical::from_logits(&[2.0, 2.0, 2.0, 2.0]);
    assert_eq!(uniform.mode(), 0);
    assert!((uniform.entropy() - 4.0f32.ln()).abs() < 1e-5);
    assert!(peaked.entropy() < uniform.entropy());
}

#[test]
#[should_panic(expected = "at least one outcome")]
fn empty_logits_panic() {
    let _ = Categorical::from_logits(&[]);
}
