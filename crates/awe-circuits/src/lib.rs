//! Interactive circuit diagrams for essays.
//!
//! Each widget is a small state machine that renders SVG markup. The
//! generator turns a widget into a Web Component that ships with every
//! reachable state pre-rendered, so the page works without JavaScript and
//! the client only animates particles and dashes.

pub mod animation;
pub mod generator;
pub mod geometry;
pub mod particles;
pub mod registry;
pub mod svg;
pub mod traits;
pub mod widgets;

pub use animation::{AnimationLoop, Animator, DashFlow, DashSpec, LoopState, LoopTransition};
pub use generator::{generate_web_component, GeneratedWidget, StateTable};
pub use geometry::{MotionPath, Point};
pub use particles::{Particle, ParticleField, ParticleSpec};
pub use registry::{tag_name, Props, WidgetRegistry};
pub use traits::{Frame, Motion, Widget, WidgetError};
