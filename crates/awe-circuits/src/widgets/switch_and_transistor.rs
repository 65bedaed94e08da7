//! A mechanical switch next to a transistor doing the same job.

use super::{framed, particle_layer};
use crate::geometry::{MotionPath, Point};
use crate::particles::ParticleSpec;
use crate::svg::{lit, SvgBuilder};
use crate::traits::{Frame, Motion, Widget, WidgetError};

const NAME: &str = "SwitchAndTransistor";
const SWITCH_Y: f64 = 110.0;
const TRANSISTOR_X: f64 = 480.0;
const OUTPUT_Y: f64 = 175.0;
const GLOW: &str = "sat-glow";
const PARTICLE_GLOW: &str = "sat-particle-glow";

const SWITCH_LANE: usize = 0;
const TRANSISTOR_LANE: usize = 1;

const SPEC: ParticleSpec = ParticleSpec {
    spawn_interval_ms: 500.0,
    step: 0.012,
};

#[derive(Debug, Clone, Default)]
pub struct SwitchAndTransistor {
    switch_closed: bool,
    transistor_on: bool,
}

impl SwitchAndTransistor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn switch_closed(&self) -> bool {
        self.switch_closed
    }

    pub fn transistor_on(&self) -> bool {
        self.transistor_on
    }

    fn lanes() -> Vec<MotionPath> {
        vec![
            MotionPath::line(Point::new(42.0, SWITCH_Y), Point::new(225.0, SWITCH_Y)),
            MotionPath::starting_at(Point::new(TRANSISTOR_X, 18.0))
                .then(Point::new(TRANSISTOR_X, OUTPUT_Y), 0.7)
                .then(Point::new(565.0, OUTPUT_Y), 1.0),
        ]
    }

    fn draw_switch(&self, svg: &mut SvgBuilder) {
        let on = self.switch_closed;
        let arm_end = if on { (160.0, SWITCH_Y) } else { (148.0, 70.0) };

        svg.open_action("switch")
            .hit_area(20.0, 50.0, 230.0, 100.0)
            .line((30.0, 95.0), (30.0, 125.0), "terminal", 3.0)
            .line((42.0, 100.0), (42.0, 120.0), "terminal", 2.0)
            .text((30.0, 88.0), 12, "terminal-label", "+")
            .line((42.0, SWITCH_Y), (80.0, SWITCH_Y), "wire is-on", 2.0)
            .circle((80.0, SWITCH_Y), 4.0, "contact is-on")
            .circle((160.0, SWITCH_Y), 4.0, &lit("contact", on))
            .line((80.0, SWITCH_Y), arm_end, &lit("arm", on), 3.0)
            .line((160.0, SWITCH_Y), (211.0, SWITCH_Y), &lit("wire", on), 2.0);

        if on {
            svg.glowing_circle((225.0, SWITCH_Y), 14.0, "bulb is-on", GLOW);
        } else {
            svg.circle((225.0, SWITCH_Y), 14.0, "bulb");
        }

        svg.text((125.0, 200.0), 14, &lit("label", on), "Switch")
            .close_group();
    }

    fn draw_transistor(&self, svg: &mut SvgBuilder) {
        let on = self.transistor_on;
        let body = lit("wire", on);
        let x = TRANSISTOR_X;

        svg.open_action("transistor")
            .hit_area(350.0, 10.0, 240.0, 200.0)
            .line((468.0, 8.0), (492.0, 8.0), "terminal", 3.0)
            .line((472.0, 18.0), (488.0, 18.0), "terminal", 2.0)
            .line((x, 18.0), (x, 82.0), "wire is-on", 2.0)
            .circle((x, SWITCH_Y), 28.0, &lit("transistor", on))
            .line((x, 82.0), (x, 95.0), "wire is-on", 2.0)
            .line((452.0, 98.0), (452.0, 122.0), &body, 3.0)
            .line((452.0, 104.0), (x, 95.0), &body, 2.0)
            .line((452.0, 116.0), (x, 125.0), &body, 2.0)
            .line((x, 125.0), (x, 138.0), &body, 2.0)
            .polygon("480,138 476,130 484,130", &lit("arrow", on))
            .line((x, 138.0), (x, OUTPUT_Y), &body, 2.0)
            .line((x, OUTPUT_Y), (551.0, OUTPUT_Y), &body, 2.0)
            .line((380.0, SWITCH_Y), (452.0, SWITCH_Y), &lit("wire", on), 2.0)
            .circle((380.0, SWITCH_Y), 6.0, &lit("input", on))
            .text((365.0, 95.0), 16, &lit("label", on), "B")
            .text((498.0, 72.0), 10, "annotation", "C")
            .text((498.0, 152.0), 10, "annotation", "E");

        if on {
            svg.glowing_circle((565.0, OUTPUT_Y), 14.0, "indicator is-on", GLOW);
        } else {
            svg.circle((565.0, OUTPUT_Y), 14.0, "indicator");
        }

        svg.text((x, 210.0), 14, &lit("label", on), "Transistor")
            .close_group();
    }
}

impl Widget for SwitchAndTransistor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn hint(&self) -> &'static str {
        "click to toggle"
    }

    fn actions(&self) -> &'static [&'static str] {
        &["switch", "transistor"]
    }

    fn apply(&mut self, action: &str) -> Result<(), WidgetError> {
        match action {
            "switch" => self.switch_closed = !self.switch_closed,
            "transistor" => self.transistor_on = !self.transistor_on,
            _ => {
                return Err(WidgetError::UnknownAction {
                    widget: NAME,
                    action: action.to_string(),
                })
            }
        }
        Ok(())
    }

    fn active_lanes(&self) -> Vec<usize> {
        let mut lanes = Vec::with_capacity(2);
        if self.switch_closed {
            lanes.push(SWITCH_LANE);
        }
        if self.transistor_on {
            lanes.push(TRANSISTOR_LANE);
        }
        lanes
    }

    fn motion(&self) -> Motion {
        Motion::Particles {
            spec: SPEC,
            lanes: Self::lanes(),
        }
    }

    fn state_key(&self) -> String {
        format!(
            "s{}t{}",
            u8::from(self.switch_closed),
            u8::from(self.transistor_on)
        )
    }

    fn render(&self, frame: &Frame<'_>) -> String {
        let mut svg = SvgBuilder::new(650, 220);
        svg.glow_filter(GLOW, 3.0, 200, 1)
            .glow_filter(PARTICLE_GLOW, 2.0, 300, 2);

        self.draw_switch(&mut svg);
        self.draw_transistor(&mut svg);

        if self.is_animating() || !frame.particles.is_empty() {
            particle_layer(&mut svg, frame, &Self::lanes(), PARTICLE_GLOW);
        }

        framed(svg.finish(), self.hint())
    }

    fn boxed_clone(&self) -> Box<dyn Widget> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::Particle;

    #[test]
    fn sides_toggle_independently() {
        let mut widget = SwitchAndTransistor::new();
        assert!(widget.active_lanes().is_empty());

        widget.apply("transistor").unwrap();
        assert_eq!(widget.active_lanes(), vec![TRANSISTOR_LANE]);
        assert_eq!(widget.state_key(), "s0t1");

        widget.apply("switch").unwrap();
        assert_eq!(widget.active_lanes(), vec![SWITCH_LANE, TRANSISTOR_LANE]);
        assert_eq!(widget.state_key(), "s1t1");
    }

    #[test]
    fn transistor_particles_turn_the_corner() {
        let mut widget = SwitchAndTransistor::new();
        widget.apply("transistor").unwrap();

        let particles = [Particle {
            id: 1,
            lane: TRANSISTOR_LANE,
            progress: 0.85,
        }];
        let markup = widget.render(&Frame {
            particles: &particles,
            dash_offset: 0,
        });

        assert!(markup.contains(r#"<circle cx="522.5" cy="175" r="4" class="particle""#));
    }

    #[test]
    fn renders_each_side() {
        let mut widget = SwitchAndTransistor::new();
        widget.apply("switch").unwrap();
        let markup = widget.render(&Frame::still());

        assert!(markup.contains(r#"class="bulb is-on""#));
        assert!(markup.contains(r#"<circle cx="565" cy="175" r="14" class="indicator"/>"#));
        assert!(markup.contains(r#"data-action="switch""#));
        assert!(markup.contains(r#"data-action="transistor""#));
    }
}
