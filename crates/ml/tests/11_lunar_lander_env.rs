use ml::*;
use physics::{LanderStatus, Vec2};

#[test]
fn sizes_match_the_task() {
    let mut env = LunarLanderEnv::new(0);
    assert_eq!(env.obs_size(), 8);
    assert_eq!(env.action_size(), 4);
    assert_eq!(env.reset().len(), 8);

    let step = env.step(0).unwrap();
    assert_eq!(step.obs.len(), 8);
    assert!(step.reward.is_finite());
    assert!(!step.done);
}

#[test]
fn invalid_action_is_an_error() {
    let mut env = LunarLanderEnv::new(0);
    let err = env.step(4).unwrap_err();
    assert!(matches!(err, MlError::InvalidAction { action: 4, size: 4 }));
}

#[test]
fn spawn_is_seeded() {
    let a = LunarLanderEnv::new(12).reset();
    let b = LunarLanderEnv::new(12).reset();
    let c = LunarLanderEnv::new(13).reset();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn crash_ends_the_episode_with_penalty() {
    let mut env = LunarLanderEnv::new(0);
    env.lander_mut().state.pos = Vec2::new(0.0, 1.0);
    env.lander_mut().state.vel = Vec2::new(0.0, -10.0);
    let step = env.step(0).unwrap();
    assert!(step.done);
    assert_eq!(step.reward, -100.0);
    assert_eq!(env.lander().status(), LanderStatus::Crashed);

    let err = env.step(0).unwrap_err();
    assert!(matches!(err, MlError::Physics(_)));
}

#[test]
fn leaving_the_viewport_is_penalized() {
    let mut env = LunarLanderEnv::new(0);
    env.lander_mut().state.pos = Vec2::new(9.95, 5.0);
    env.lander_mut().state.vel = Vec2::new(5.0, 0.0);
    let step = env.step(0).unwrap();
    assert!(step.done);
    assert_eq!(step.reward, -100.0);
}

#[test]
fn resting_on_the_pad_is_rewarded() {
    let mut env = LunarLanderEnv::new(0);
    let leg = env.lander().config.leg_tip.y;
    env.lander_mut().state.pos = Vec2::new(0.0, -leg);
    env.lander_mut().state.vel = Vec2::ZERO;

    let mut last = None;
    for _ in 0..100 {
        let step = env.step(0).unwrap();
        let done = step.done;
        last = Some(step);
        if done {
            break;
        }
    }
    let last = last.unwrap();
    assert!(last.done);
    assert_eq!(last.reward, 100.0);
    assert_eq!(&last.obs[6..], &[1.0, 1.0]);
}

#[test]
fn reset_starts_a_new_episode() {
    let mut env = LunarLanderEnv::new(0);
    env.lander_mut().state.pos = Vec2::new(0.0, 1.0);
    env.lander_mut().state.vel = Vec2::new(0.0, -10.0);
    assert!(env.step(0).unwrap().done);

    let obs = env.reset();
    assert_eq!(env.lander().status(), LanderStatus::Flying);
    assert_eq!(&obs[6..], &[0.0, 0.0]);
    assert!(env.step(1).is_ok());
}
