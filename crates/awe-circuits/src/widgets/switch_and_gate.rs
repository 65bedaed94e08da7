//! Two switches in series lighting a bulb.

use super::{battery, expression, framed, particle_layer, AndInputs};
use crate::geometry::{MotionPath, Point};
use crate::particles::ParticleSpec;
use crate::svg::{lit, SvgBuilder};
use crate::traits::{Frame, Motion, Widget, WidgetError};

const NAME: &str = "SwitchAndGate";
const WIRE_Y: f64 = 60.0;
const BULB_X: f64 = 530.0;
const GLOW: &str = "sag-glow";
const PARTICLE_GLOW: &str = "sag-particle-glow";

const SPEC: ParticleSpec = ParticleSpec {
    spawn_interval_ms: 400.0,
    step: 0.008,
};

#[derive(Debug, Clone, Default)]
pub struct SwitchAndGate {
    inputs: AndInputs,
}

impl SwitchAndGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> AndInputs {
        self.inputs
    }

    pub fn is_complete(&self) -> bool {
        self.inputs.output()
    }

    /// X coordinate where current stops: at switch A, switch B or the bulb.
    pub fn electricity_end(&self) -> f64 {
        match (self.inputs.a, self.inputs.b) {
            (false, _) => 130.0,
            (true, false) => 330.0,
            (true, true) => BULB_X,
        }
    }

    fn lane() -> MotionPath {
        MotionPath::line(Point::new(30.0, WIRE_Y), Point::new(BULB_X, WIRE_Y))
    }

    fn switch(
        svg: &mut SvgBuilder,
        action: &str,
        left: f64,
        closed: bool,
        left_live: bool,
        right_live: bool,
    ) {
        let right = left + 80.0;
        let arm_end = if closed {
            (right, WIRE_Y)
        } else {
            (right - 10.0, 25.0)
        };
        let label = action.to_uppercase();

        svg.open_action(action)
            .hit_area(left - 20.0, 15.0, 120.0, 60.0)
            .text((left + 40.0, 25.0), 14, &lit("label", closed), &label)
            .circle((left, WIRE_Y), 4.0, &lit("contact", left_live))
            .circle((right, WIRE_Y), 4.0, &lit("contact", right_live))
            .line((left, WIRE_Y), arm_end, &lit("arm", closed), 3.0)
            .close_group();
    }
}

impl Widget for SwitchAndGate {
    fn name(&self) -> &'static str {
        NAME
    }

    fn hint(&self) -> &'static str {
        "click the switches"
    }

    fn actions(&self) -> &'static [&'static str] {
        AndInputs::ACTIONS
    }

    fn apply(&mut self, action: &str) -> Result<(), WidgetError> {
        self.inputs.toggle(NAME, action)
    }

    fn output(&self) -> bool {
        self.is_complete()
    }

    fn active_lanes(&self) -> Vec<usize> {
        if self.is_complete() {
            vec![0]
        } else {
            Vec::new()
        }
    }

    fn motion(&self) -> Motion {
        Motion::Particles {
            spec: SPEC,
            lanes: vec![Self::lane()],
        }
    }

    fn state_key(&self) -> String {
        self.inputs.key()
    }

    fn render(&self, frame: &Frame<'_>) -> String {
        let AndInputs { a, b } = self.inputs;
        let complete = self.is_complete();
        let end = self.electricity_end();

        let mut svg = SvgBuilder::new(560, 120);
        svg.glow_filter(GLOW, 3.0, 200, 1)
            .glow_filter(PARTICLE_GLOW, 2.0, 300, 2);

        battery(&mut svg, 10.0, WIRE_Y, 30.0);

        svg.line((30.0, WIRE_Y), (130.0, WIRE_Y), &lit("wire", end >= 130.0), 2.0)
            .line((210.0, WIRE_Y), (330.0, WIRE_Y), &lit("wire", end >= 330.0), 2.0)
            .line((410.0, WIRE_Y), (BULB_X - 12.0, WIRE_Y), &lit("wire", complete), 2.0);

        Self::switch(&mut svg, "a", 130.0, a, a, a);
        Self::switch(&mut svg, "b", 330.0, b, a, complete);

        if complete {
            svg.glowing_circle((BULB_X, WIRE_Y), 12.0, "bulb is-on", GLOW);
            particle_layer(&mut svg, frame, &[Self::lane()], PARTICLE_GLOW);
        } else {
            svg.circle((BULB_X, WIRE_Y), 12.0, "bulb");
        }

        expression(&mut svg, (280.0, 105.0), self.inputs);

        framed(svg.finish(), self.hint())
    }

    fn boxed_clone(&self) -> Box<dyn Widget> {
        Box::new(self.clone())
    }
}
