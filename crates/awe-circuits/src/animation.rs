//! Redraw loops for widgets.
//!
//! Each widget owns at most one loop. It starts when the widget's circuit
//! becomes live and is cancelled on the next sync after it goes dead, which
//! also clears any particles still in flight.

use serde::Serialize;

use crate::particles::{Particle, ParticleField};
use crate::traits::{Frame, Motion, Widget, WidgetError};

/// Timing of a dash-flow animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashSpec {
    pub interval_ms: u32,
    pub step: u32,
    pub period: u32,
}

/// Dash offset that advances on a fixed interval.
#[derive(Debug, Clone)]
pub struct DashFlow {
    spec: DashSpec,
    offset: u32,
    last: Option<f64>,
}

impl DashFlow {
    pub fn new(spec: DashSpec) -> Self {
        Self {
            spec,
            offset: 0,
            last: None,
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Apply every interval that elapsed up to `now_ms`.
    pub fn tick(&mut self, now_ms: f64) {
        let interval = f64::from(self.spec.interval_ms.max(1));
        let Some(mut last) = self.last else {
            self.last = Some(now_ms);
            return;
        };
        while now_ms - last >= interval {
            self.offset = (self.offset + self.spec.step) % self.spec.period.max(1);
            last += interval;
        }
        self.last = Some(last);
    }

    /// Stop timing; the offset is kept where it was.
    pub fn pause(&mut self) {
        self.last = None;
    }
}

/// Whether a loop is scheduled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopState {
    Idle,
    Running { started_at: f64, frames: u64 },
}

/// Result of syncing a loop with its trigger condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopTransition {
    Started,
    Stopped,
    Unchanged,
}

/// A start/stop redraw loop.
#[derive(Debug, Clone)]
pub struct AnimationLoop {
    state: LoopState,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    /// Start or cancel the loop to match `condition`.
    pub fn sync(&mut self, condition: bool, now_ms: f64) -> LoopTransition {
        match (self.state, condition) {
            (LoopState::Idle, true) => {
                self.state = LoopState::Running {
                    started_at: now_ms,
                    frames: 0,
                };
                LoopTransition::Started
            }
            (LoopState::Running { .. }, false) => {
                self.state = LoopState::Idle;
                LoopTransition::Stopped
            }
            _ => LoopTransition::Unchanged,
        }
    }

    /// Count a frame. Returns false when the loop is idle.
    pub fn frame(&mut self) -> bool {
        match &mut self.state {
            LoopState::Running { frames, .. } => {
                *frames += 1;
                true
            }
            LoopState::Idle => false,
        }
    }
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// A widget together with its animation state.
///
/// This is the model the generated client script follows: actions change
/// the widget, then the loop is synced; frames advance particles or dashes
/// only while the loop runs.
#[derive(Debug)]
pub struct Animator {
    widget: Box<dyn Widget>,
    redraw: AnimationLoop,
    particles: Option<ParticleField>,
    dash: Option<DashFlow>,
}

impl Animator {
    pub fn new(widget: Box<dyn Widget>) -> Self {
        let (particles, dash) = match widget.motion() {
            Motion::Still => (None, None),
            Motion::Particles { spec, lanes } => {
                (Some(ParticleField::new(spec, lanes.len())), None)
            }
            Motion::Dash(spec) => (None, Some(DashFlow::new(spec))),
        };

        let mut animator = Self {
            widget,
            redraw: AnimationLoop::new(),
            particles,
            dash,
        };
        animator.sync(0.0);
        animator
    }

    pub fn widget(&self) -> &dyn Widget {
        self.widget.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.redraw.is_running()
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles
            .as_ref()
            .map(ParticleField::particles)
            .unwrap_or_default()
    }

    pub fn dash_offset(&self) -> u32 {
        self.dash.as_ref().map_or(0, DashFlow::offset)
    }

    /// Apply an action and restart or cancel the loop accordingly.
    pub fn apply(&mut self, action: &str, now_ms: f64) -> Result<LoopTransition, WidgetError> {
        self.widget.apply(action)?;
        Ok(self.sync(now_ms))
    }

    fn sync(&mut self, now_ms: f64) -> LoopTransition {
        let transition = self.redraw.sync(self.widget.is_animating(), now_ms);
        if transition == LoopTransition::Stopped {
            if let Some(field) = self.particles.as_mut() {
                field.clear();
            }
            if let Some(dash) = self.dash.as_mut() {
                dash.pause();
            }
        }
        transition
    }

    /// Run one redraw at `now_ms`. Does nothing while idle.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.redraw.frame() {
            return false;
        }
        if let Some(field) = self.particles.as_mut() {
            field.tick(now_ms, &self.widget.active_lanes());
        }
        if let Some(dash) = self.dash.as_mut() {
            dash.tick(now_ms);
        }
        true
    }

    /// Render the widget with the current animation state.
    pub fn render(&self) -> String {
        self.widget.render(&Frame {
            particles: self.particles(),
            dash_offset: self.dash_offset(),
        })
    }
}
