//! AND gate built from two NPN transistors stacked between the supply and
//! the output resistor.

use super::{expression, framed, particle_layer, AndInputs};
use crate::geometry::{MotionPath, Point};
use crate::particles::ParticleSpec;
use crate::svg::{lit, num, SvgBuilder};
use crate::traits::{Frame, Motion, Widget, WidgetError};

const NAME: &str = "TransistorAndGate";
const RAIL_X: f64 = 200.0;
const TRANSISTOR_A_Y: f64 = 120.0;
const TRANSISTOR_B_Y: f64 = 240.0;
const JUNCTION_Y: f64 = 310.0;
const GROUND_Y: f64 = 365.0;
const GLOW: &str = "tag-glow";
const PARTICLE_GLOW: &str = "tag-particle-glow";

const SPEC: ParticleSpec = ParticleSpec {
    spawn_interval_ms: 500.0,
    step: 0.006,
};

#[derive(Debug, Clone, Default)]
pub struct TransistorAndGate {
    inputs: AndInputs,
}

impl TransistorAndGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> AndInputs {
        self.inputs
    }

    /// Y coordinate where current stops flowing down the rail.
    pub fn electricity_end_y(&self) -> f64 {
        match (self.inputs.a, self.inputs.b) {
            (false, _) => 95.0,
            (true, false) => 215.0,
            (true, true) => GROUND_Y,
        }
    }

    fn lane() -> MotionPath {
        MotionPath::line(Point::new(RAIL_X, 35.0), Point::new(RAIL_X, GROUND_Y))
    }

    fn transistor(svg: &mut SvgBuilder, cy: f64, on: bool, fed: bool) {
        let body = lit("wire", on);
        let arrow = format!(
            "{},{} {},{} {},{}",
            num(RAIL_X),
            num(cy + 28.0),
            num(RAIL_X - 4.0),
            num(cy + 20.0),
            num(RAIL_X + 4.0),
            num(cy + 20.0)
        );

        svg.circle((RAIL_X, cy), 28.0, &lit("transistor", on))
            .line((RAIL_X, cy - 28.0), (RAIL_X, cy - 15.0), &lit("wire", fed), 2.0)
            .line((RAIL_X, cy + 15.0), (RAIL_X, cy + 28.0), &body, 2.0)
            .polygon(&arrow, &lit("arrow", on))
            .line((188.0, cy - 10.0), (188.0, cy + 10.0), &body, 3.0)
            .line((188.0, cy - 5.0), (RAIL_X, cy - 15.0), &body, 2.0)
            .line((188.0, cy + 5.0), (RAIL_X, cy + 15.0), &body, 2.0)
            .line((172.0, cy), (188.0, cy), &lit("wire", on), 2.0);
    }

    fn input(svg: &mut SvgBuilder, action: &str, cy: f64, on: bool) {
        let mut resistor = format!("M90,{}", num(cy));
        for (i, x) in (95..=165).step_by(10).enumerate() {
            let dy = if i % 2 == 0 { -8.0 } else { 8.0 };
            resistor.push_str(&format!(" L{},{}", x, num(cy + dy)));
        }
        resistor.push_str(&format!(" L172,{}", num(cy)));

        svg.open_action(action)
            .hit_area(60.0, cy - 35.0, 180.0, 70.0)
            .line((60.0, cy), (90.0, cy), &lit("wire", on), 2.0)
            .path(&resistor, &lit("resistor", on), 2.0)
            .text((120.0, cy - 12.0), 10, "annotation", "R")
            .text((45.0, cy + 5.0), 16, &lit("label", on), &action.to_uppercase())
            .circle((60.0, cy), 6.0, &lit("input", on))
            .close_group();
    }
}

impl Widget for TransistorAndGate {
    fn name(&self) -> &'static str {
        NAME
    }

    fn hint(&self) -> &'static str {
        "click A or B to apply voltage"
    }

    fn actions(&self) -> &'static [&'static str] {
        AndInputs::ACTIONS
    }

    fn apply(&mut self, action: &str) -> Result<(), WidgetError> {
        self.inputs.toggle(NAME, action)
    }

    fn output(&self) -> bool {
        self.inputs.output()
    }

    fn active_lanes(&self) -> Vec<usize> {
        if self.inputs.output() {
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
        let out = self.inputs.output();
        let end = self.electricity_end_y();

        let mut svg = SvgBuilder::new(400, 420);
        svg.glow_filter(GLOW, 3.0, 200, 1)
            .glow_filter(PARTICLE_GLOW, 2.0, 300, 2);

        svg.circle((RAIL_X, 20.0), 14.0, "supply")
            .text((RAIL_X, 25.0), 14, "supply-label", "V")
            .line((RAIL_X, 34.0), (RAIL_X, 92.0), "wire is-on", 2.0);

        Self::transistor(&mut svg, TRANSISTOR_A_Y, a, true);
        svg.line(
            (RAIL_X, 148.0),
            (RAIL_X, 212.0),
            &lit("wire", end >= 215.0),
            2.0,
        );
        Self::transistor(&mut svg, TRANSISTOR_B_Y, out, a);

        svg.line((RAIL_X, 268.0), (RAIL_X, 325.0), &lit("wire", out), 2.0)
            .circle((RAIL_X, JUNCTION_Y), 4.0, &lit("junction", out))
            .line((RAIL_X, JUNCTION_Y), (280.0, JUNCTION_Y), &lit("wire", out), 2.0)
            .text((300.0, 315.0), 14, &lit("label", out), "Out")
            .path(
                "M200,325 L208,330 L192,340 L208,350 L192,360 L200,365",
                &lit("resistor", out),
                2.0,
            )
            .line((185.0, GROUND_Y), (215.0, GROUND_Y), "ground", 2.0)
            .line((190.0, 370.0), (210.0, 370.0), "ground", 2.0)
            .line((195.0, 375.0), (205.0, 375.0), "ground", 2.0);

        if out {
            svg.glowing_circle((280.0, JUNCTION_Y), 8.0, "indicator is-on", GLOW);
        } else {
            svg.circle((280.0, JUNCTION_Y), 8.0, "indicator");
        }

        Self::input(&mut svg, "a", TRANSISTOR_A_Y, a);
        Self::input(&mut svg, "b", TRANSISTOR_B_Y, b);

        if out {
            particle_layer(&mut svg, frame, &[Self::lane()], PARTICLE_GLOW);
        }

        expression(&mut svg, (RAIL_X, 410.0), self.inputs);

        framed(svg.finish(), self.hint())
    }

    fn boxed_clone(&self) -> Box<dyn Widget> {
        Box::new(self.clone())
    }
}
