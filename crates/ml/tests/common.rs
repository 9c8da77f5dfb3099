#![allow(dead_code)]

use ml::{Env, MlError, Step};

/// Plays back a fixed reward sequence; the episode ends after the last one.
///
/// Observations encode the step index so every step looks different.
pub struct ScriptedEnv {
    pub rewards: Vec<f32>,
    pub obs_size: usize,
    pub action_size: usize,
    pub t: usize,
    pub resets: usize,
}

impl ScriptedEnv {
    pub fn new(rewards: Vec<f32>) -> Self {
        Self { rewards, obs_size: 4, action_size: 3, t: 0, resets: 0 }
    }

    fn obs(&self) -> Vec<f32> {
        let t = self.t as f32;
        (0..self.obs_size).map(|i| (t + 1.0) * 0.1 * (i as f32 + 1.0) - 0.2).collect()
    }
}

impl Env for ScriptedEnv {
    fn step(&mut self, action: usize) -> Result<Step, MlError> {
        if action >= self.action_size {
            return Err(MlError::InvalidAction { action, size: self.action_size });
        }
        let reward = self.rewards[self.t];
        self.t += 1;
        Ok(Step { obs: self.obs(), reward, done: self.t == self.rewards.len() })
    }

    fn reset(&mut self) -> Vec<f32> {
        self.t = 0;
        self.resets += 1;
        self.obs()
    }

    fn obs_size(&self) -> usize {
        self.obs_size
    }

    fn action_size(&self) -> usize {
        self.action_size
    }
}

/// Rewards action 0 and punishes the others; never ends on its own.
pub struct BanditEnv;

impl Env for BanditEnv {
    fn step(&mut self, action: usize) -> Result<Step, MlError> {
        let reward = if action == 0 { 1.0 } else { -1.0 };
        Ok(Step { obs: vec![1.0, 0.5], reward, done: false })
    }

    fn reset(&mut self) -> Vec<f32> {
        vec![1.0, 0.5]
    }

    fn obs_size(&self) -> usize {
        2
    }

    fn action_size(&self) -> usize {
        3
    }
}
