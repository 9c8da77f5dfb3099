use ml::returns::{compute_returns, discounted_returns, normalize_returns};

fn assert_all_close(got: &[f32], want: &[f32]) {
    assert_eq!(got.len(), want.len());
    for (g, w) in got.iter().zip(want) {
        assert!((g - w).abs() < 1e-5, "{got:?} != {want:?}");
    }
}

#[test]
fn undiscounted_returns_are_suffix_sums() {
    assert_all_close(&discounted_returns(&[1.0, 1.0, 1.0], 1.0), &[3.0, 2.0, 1.0]);
}

#[test]
fn discount_halves_each_step_back() {
    assert_all_close(&discounted_returns(&[0.0, 0.0, 10.0], 0.5), &[2.5, 5.0, 10.0]);
}

#[test]
fn last_return_is_last_reward() {
    let rewards = [0.3, -2.0, 4.5, -1.25];
    let returns = discounted_returns(&rewards, 0.99);
    assert_eq!(returns.len(), rewards.len());
    assert_eq!(returns[3], -1.25);
    assert!((returns[2] - (4.5 + 0.99 * -1.25)).abs() < 1e-6);
}

#[test]
fn normalized_returns_have_zero_mean_unit_std() {
    let returns = compute_returns(&[1.0, 0.0, -3.0, 2.0, 5.0, 0.5], 0.9);
    let n = returns.len() as f32;
    let mean = returns.iter().sum::<f32>() / n;
    let std = (returns.iter().map(|g| (g - mean).powi(2)).sum::<f32>() / (n - 1.0)).sqrt();
    assert!(mean.abs() < 1e-5, "mean {mean}");
    assert!((std - 1.0).abs() < 1e-4, "std {std}");
}

#[test]
fn normalization_preserves_order() {
    let raw = discounted_returns(&[0.0, 0.0, 10.0], 0.5);
    let norm = normalize_returns(&raw);
    assert!(norm[0] < norm[1] && norm[1] < norm[2]);
}

#[test]
fn single_step_returns_stay_raw() {
    assert_eq!(compute_returns(&[7.0], 0.99), vec![7.0]);
}

#[test]
fn constant_returns_stay_raw() {
    assert_eq!(normalize_returns(&[2.0, 2.0, 2.0]), vec![2.0, 2.0, 2.0]);
}

#[test]
fn empty_episode_has_no_returns() {
    assert!(compute_returns(&[], 0.99).is_empty());
}
