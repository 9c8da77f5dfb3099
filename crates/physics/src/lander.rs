//! # Lunar Lander Body
//!
//! A single rigid body with a main engine, two orientation engines and two
//! landing legs, integrated in the plane at a fixed frame rate.
//!
//! World coordinates put the landing pad surface at `y = 0` and the pad
//! center at `x = 0`. Angles are counter-clockwise in radians. The ground is
//! flat; touching it with the hull, or with the legs faster than
//! [`LanderConfig::crash_speed`], ends the episode as a crash.

use crate::error::PhysicsError;
use crate::types::Vec2;

/// Length of [`Lander::observation`].
pub const OBSERVATION_SIZE: usize = 8;

/// The lander's discrete engine commands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LanderAction {
    Noop,
    /// Left orientation engine: pushes the hull right and rotates it clockwise.
    FireLeft,
    FireMain,
    /// Right orientation engine: pushes the hull left and rotates it counter-clockwise.
    FireRight,
}

impl LanderAction {
    pub const COUNT: usize = 4;

    pub const ALL: [LanderAction; Self::COUNT] = [
        LanderAction::Noop,
        LanderAction::FireLeft,
        LanderAction::FireMain,
        LanderAction::FireRight,
    ];
}

impl TryFrom<usize> for LanderAction {
    type Error = PhysicsError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value)
            .copied()
            .ok_or(PhysicsError::InvalidAction(value))
    }
}

impl From<LanderAction> for usize {
    fn from(action: LanderAction) -> Self {
        match action {
            LanderAction::Noop => 0,
            LanderAction::FireLeft => 1,
            LanderAction::FireMain => 2,
            LanderAction::FireRight => 3,
        }
    }
}

/// Configuration for a [`Lander`].
#[derive(Clone, Debug)]
pub struct LanderConfig {
    /// Downward gravitational acceleration (m/s²)
    pub gravity: f32,
    /// Simulation steps per second
    pub fps: f32,
    /// Acceleration along the hull's up axis while the main engine fires
    pub main_engine_accel: f32,
    /// Lateral acceleration from an orientation engine
    pub side_engine_accel: f32,
    /// Angular acceleration from an orientation engine (rad/s²)
    pub side_engine_torque: f32,
    /// Half the viewport width; leaving it ends the episode
    pub world_half_width: f32,
    /// Viewport height, used to scale the vertical observation
    pub world_height: f32,
    /// Spawn altitude of the hull center above the pad
    pub spawn_height: f32,
    /// Hull half extents (width, height)
    pub hull_half_extents: Vec2,
    /// Local position of the right leg tip; the left tip mirrors it
    pub leg_tip: Vec2,
    /// Vertical touchdown speed above which the legs give way
    pub crash_speed: f32,
    /// Fraction of sliding and spinning velocity removed per grounded step
    pub ground_friction: f32,
    /// Rate at which a grounded hull levels out onto both legs
    pub settle_rate: f32,
    /// Speed and spin below which a hull on both legs counts as landed
    pub rest_threshold: f32,
}

impl Default for LanderConfig {
    fn default() -> Self {
        Self {
            gravity: 10.0,
            fps: 50.0,
            main_engine_accel: 16.0,
            side_engine_accel: 0.8,
            side_engine_torque: 3.0,
            world_half_width: 10.0,
            world_height: 40.0 / 3.0,
            spawn_height: 10.0,
            hull_half_extents: Vec2::new(0.55, 0.45),
            leg_tip: Vec2::new(0.7, -0.9),
            crash_speed: 3.0,
            ground_friction: 0.1,
            settle_rate: 8.0,
            rest_threshold: 0.05,
        }
    }
}

/// Kinematic state of the hull.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LanderState {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub angular_vel: f32,
    /// Ground contact of the (left, right) legs
    pub legs_contact: [bool; 2],
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LanderStatus {
    Flying,
    /// Resting on both legs
    Landed,
    Crashed,
    OutOfBounds,
}

impl LanderStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, LanderStatus::Flying)
    }
}

/// What one [`Lander::step`] did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepOutcome {
    /// Main engine throttle used this step (0 or 1)
    pub main_power: f32,
    /// Orientation engine throttle used this step (0 or 1)
    pub side_power: f32,
    pub status: LanderStatus,
}

pub struct Lander {
    pub config: LanderConfig,
    pub state: LanderState,
    status: LanderStatus,
}

impl Lander {
    #[must_use]
    pub fn new(config: LanderConfig) -> Self {
        let mut lander = Self {
            config,
            state: LanderState::default(),
            status: LanderStatus::Flying,
        };
        lander.reset(Vec2::ZERO);
        lander
    }

    /// Puts the hull back at the spawn point, level, moving with `initial_vel`.
    pub fn reset(&mut self, initial_vel: Vec2) {
        self.state = LanderState {
            pos: Vec2::new(0.0, self.config.spawn_height),
            vel: initial_vel,
            ..LanderState::default()
        };
        self.status = LanderStatus::Flying;
    }

    #[must_use]
    pub fn status(&self) -> LanderStatus {
        self.status
    }

    /// Advances the simulation by one frame under `action`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::EpisodeOver`] once the lander has landed,
    /// crashed or left the viewport.
    pub fn step(&mut self, action: LanderAction) -> Result<StepOutcome, PhysicsError> {
        if self.status.is_terminal() {
            return Err(PhysicsError::EpisodeOver);
        }
        let dt = 1.0 / self.config.fps;
        let up = Vec2::new(0.0, 1.0).rotate(self.state.angle);
        let right = Vec2::new(1.0, 0.0).rotate(self.state.angle);

        let mut accel = Vec2::new(0.0, -self.config.gravity);
        let mut angular_accel = 0.0;
        let mut main_power = 0.0;
        let mut side_power = 0.0;
        match action {
            LanderAction::Noop => {}
            LanderAction::FireMain => {
                accel += up * self.config.main_engine_accel;
                main_power = 1.0;
            }
            LanderAction::FireLeft | LanderAction::FireRight => {
                let direction = if action == LanderAction::FireLeft { -1.0 } else { 1.0 };
                accel += right * (-direction * self.config.side_engine_accel);
                angular_accel += direction * self.config.side_engine_torque;
                side_power = 1.0;
            }
        }

        // Semi-implicit Euler
        self.state.vel += accel * dt;
        self.state.angular_vel += angular_accel * dt;
        self.state.pos += self.state.vel * dt;
        self.state.angle += self.state.angular_vel * dt;

        self.status = self.resolve_ground(dt);
        if self.status == LanderStatus::Flying
            && self.state.pos.x.abs() >= self.config.world_half_width
        {
            self.status = LanderStatus::OutOfBounds;
        }

        Ok(StepOutcome { main_power, side_power, status: self.status })
    }

    fn resolve_ground(&mut self, dt: f32) -> LanderStatus {
        let tips = self.leg_tips();
        let lowest = tips[0].y.min(tips[1].y);
        if lowest > 0.0 {
            self.state.legs_contact = [false, false];
        } else {
            self.state.pos.y -= lowest;
            if self.state.vel.y < 0.0 {
                if -self.state.vel.y > self.config.crash_speed {
                    return LanderStatus::Crashed;
                }
                self.state.vel.y = 0.0;
            }
            let keep = 1.0 - self.config.ground_friction;
            self.state.vel.x *= keep;
            self.state.angular_vel -= self.state.angle * self.config.settle_rate * dt;
            self.state.angular_vel *= keep;
            let tips = self.leg_tips();
            self.state.legs_contact = [tips[0].y <= 1e-4, tips[1].y <= 1e-4];
        }

        if self.hull_corners().iter().any(|c| c.y <= 0.0) {
            return LanderStatus::Crashed;
        }

        let rest = self.config.rest_threshold;
        if self.state.legs_contact == [true, true]
            && self.state.vel.length() < rest
            && self.state.angular_vel.abs() < rest
        {
            return LanderStatus::Landed;
        }
        LanderStatus::Flying
    }

    /// World positions of the (left, right) leg tips.
    #[must_use]
    pub fn leg_tips(&self) -> [Vec2; 2] {
        let tip = self.config.leg_tip;
        [
            self.state.pos + Vec2::new(-tip.x, tip.y).rotate(self.state.angle),
            self.state.pos + tip.rotate(self.state.angle),
        ]
    }

    fn hull_corners(&self) -> [Vec2; 4] {
        let h = self.config.hull_half_extents;
        [
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ]
        .map(|c| self.state.pos + c.rotate(self.state.angle))
    }

    /// Observation vector: position, velocity, tilt, spin and leg contacts.
    ///
    /// Positions are scaled by half the viewport so the pad is at the origin
    /// when resting on both legs; velocities are per-frame displacements in
    /// the same scale.
    #[must_use]
    pub fn observation(&self) -> [f32; OBSERVATION_SIZE] {
        let c = &self.config;
        let s = &self.state;
        let half_height = c.world_height / 2.0;
        let contact = |b: bool| if b { 1.0 } else { 0.0 };
        [
            s.pos.x / c.world_half_width,
            (s.pos.y + c.leg_tip.y) / half_height,
            s.vel.x * c.world_half_width / c.fps,
            s.vel.y * half_height / c.fps,
            s.angle,
            20.0 * s.angular_vel / c.fps,
            contact(s.legs_contact[0]),
            contact(s.legs_contact[1]),
        ]
    }
}
