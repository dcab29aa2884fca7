use std::collections::VecDeque;

use voxland_geom::Vec3;

/// Movement keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    S,
    A,
    D,
    Q,
    E,
}

impl Key {
    pub const ALL: [Key; 6] = [Key::W, Key::S, Key::A, Key::D, Key::Q, Key::E];

    /// Body-local direction: -Z forward, +X right, +Y up.
    pub fn vector(self) -> Vec3 {
        match self {
            Key::W => Vec3::new(0.0, 0.0, -1.0),
            Key::S => Vec3::new(0.0, 0.0, 1.0),
            Key::A => Vec3::new(-1.0, 0.0, 0.0),
            Key::D => Vec3::new(1.0, 0.0, 0.0),
            Key::Q => Vec3::new(0.0, 1.0, 0.0),
            Key::E => Vec3::new(0.0, -1.0, 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Remove the focused block.
    Primary,
    /// Place a block against the focused face.
    Secondary,
}

/// Input gathered for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputFrame {
    /// Sum of key vectors times held seconds.
    pub movement: Vec3,
    /// Raw look delta; the body applies its sensitivity.
    pub look: (f32, f32),
    pub actions: Vec<Action>,
}

pub trait InputSource {
    fn poll(&mut self, dt: f32) -> InputFrame;
}

/// Accumulates how long each key has been held since the last read.
#[derive(Clone, Debug, Default)]
pub struct HeldKeys {
    held: [bool; 6],
    durations: [f32; 6],
}

impl HeldKeys {
    pub fn press(&mut self, key: Key) {
        self.held[key as usize] = true;
    }

    pub fn release(&mut self, key: Key) {
        self.held[key as usize] = false;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held[key as usize]
    }

    pub fn advance(&mut self, dt: f32) {
        for (d, &h) in self.durations.iter_mut().zip(&self.held) {
            if h {
                *d += dt;
            }
        }
    }

    /// Σ key vector × held duration; resets the durations.
    pub fn take_movement(&mut self) -> Vec3 {
        let mut v = Vec3::ZERO;
        for key in Key::ALL {
            let d = std::mem::take(&mut self.durations[key as usize]);
            v += key.vector() * d;
        }
        v
    }
}

/// One segment of a scripted input run.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptStep {
    pub ticks: u32,
    pub keys: Vec<Key>,
    /// Applied on the first tick of the step.
    pub look: (f32, f32),
    /// Fired on the first tick of the step.
    pub actions: Vec<Action>,
}

impl ScriptStep {
    pub fn idle(ticks: u32) -> Self {
        Self {
            ticks,
            keys: Vec::new(),
            look: (0.0, 0.0),
            actions: Vec::new(),
        }
    }

    pub fn hold(keys: &[Key], ticks: u32) -> Self {
        Self {
            keys: keys.to_vec(),
            ..Self::idle(ticks)
        }
    }

    pub fn look(dx: f32, dy: f32) -> Self {
        Self {
            look: (dx, dy),
            ..Self::idle(1)
        }
    }

    pub fn action(action: Action) -> Self {
        Self {
            actions: vec![action],
            ..Self::idle(1)
        }
    }
}

/// Replays a fixed list of steps, then reports no input.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    steps: VecDeque<ScriptStep>,
    keys: HeldKeys,
    elapsed_in_step: u32,
}

impl ScriptedInput {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps: steps.into(),
            ..Self::default()
        }
    }

    /// Headless tour: look around, fly forward over the hills, dig and build.
    pub fn fly_through() -> Self {
        Self::new(vec![
            ScriptStep::idle(30),
            ScriptStep::look(40.0, 0.0),
            ScriptStep::hold(&[Key::W], 120),
            ScriptStep::hold(&[Key::E], 20),
            ScriptStep::look(0.0, 60.0),
            ScriptStep::idle(5),
            ScriptStep::action(Action::Primary),
            ScriptStep::idle(5),
            ScriptStep::action(Action::Secondary),
            ScriptStep::hold(&[Key::W, Key::D], 90),
            ScriptStep::hold(&[Key::Q], 20),
            ScriptStep::look(-80.0, -30.0),
            ScriptStep::hold(&[Key::S, Key::A], 60),
        ])
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, dt: f32) -> InputFrame {
        let mut frame = InputFrame::default();
        let Some(step) = self.steps.front() else {
            return frame;
        };
        if self.elapsed_in_step == 0 {
            for &k in &step.keys {
                self.keys.press(k);
            }
            frame.look = step.look;
            frame.actions = step.actions.clone();
        }
        self.keys.advance(dt);
        frame.movement = self.keys.take_movement();
        self.elapsed_in_step += 1;
        if self.elapsed_in_step >= step.ticks.max(1) {
            for &k in &step.keys {
                self.keys.release(k);
            }
            self.steps.pop_front();
            self.elapsed_in_step = 0;
        }
        frame
    }
}
