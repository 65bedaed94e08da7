//! Trait definitions for diagram widgets.

use std::fmt;

use serde::Serialize;

use crate::animation::DashSpec;
use crate::geometry::MotionPath;
use crate::particles::{Particle, ParticleSpec};

/// How a widget animates while its circuit is live.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Motion {
    /// No animation
    Still,

    /// Particles streaming along one path per lane
    Particles {
        spec: ParticleSpec,
        lanes: Vec<MotionPath>,
    },

    /// Dashed wires whose offset advances on a fixed interval
    Dash(DashSpec),
}

/// Transient animation state passed to [`Widget::render`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Frame<'a> {
    /// Live particles to draw
    pub particles: &'a [Particle],
    /// Current dash offset for dashed wires
    pub dash_offset: u32,
}

impl Frame<'_> {
    /// A frame with nothing in motion.
    pub fn still() -> Self {
        Self::default()
    }
}

/// Errors raised by widgets and the registry.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("Unknown widget: {0}")]
    UnknownWidget(String),

    #[error("Widget {widget} has no action '{action}'")]
    UnknownAction {
        widget: &'static str,
        action: String,
    },

    #[error("Invalid prop '{prop}' for {widget}: {message}")]
    InvalidProp {
        widget: &'static str,
        prop: String,
        message: String,
    },

    #[error("Widget {widget} has more than {limit} reachable states")]
    StateSpace { widget: &'static str, limit: usize },

    #[error("Failed to serialize widget state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// An interactive diagram embedded in an essay.
///
/// Widgets are small state machines: actions (clicks) move them between
/// states, and each state renders to self-contained markup.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Component name used in essays (e.g., "SwitchAndGate")
    fn name(&self) -> &'static str;

    /// Short interaction hint shown under the diagram
    fn hint(&self) -> &'static str;

    /// Actions this widget responds to
    fn actions(&self) -> &'static [&'static str];

    /// Apply an action.
    fn apply(&mut self, action: &str) -> Result<(), WidgetError>;

    /// Logic output of the diagram, for widgets that compute one
    fn output(&self) -> bool {
        false
    }

    /// Lanes that currently spawn particles
    fn active_lanes(&self) -> Vec<usize> {
        Vec::new()
    }

    /// Whether the animation loop should be running
    fn is_animating(&self) -> bool {
        !self.active_lanes().is_empty()
    }

    fn motion(&self) -> Motion {
        Motion::Still
    }

    /// Identifier of the current state. Equal keys render equal markup.
    fn state_key(&self) -> String;

    /// Whether the reachable state space is small enough to pre-render
    fn is_finite(&self) -> bool {
        true
    }

    /// Render the current state.
    fn render(&self, frame: &Frame<'_>) -> String;

    fn boxed_clone(&self) -> Box<dyn Widget>;
}

impl Clone for Box<dyn Widget> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}
