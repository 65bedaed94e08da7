//! AND gate drawn as a series circuit with flowing dashed current and a
//! status panel.

use super::AndInputs;
use crate::animation::DashSpec;
use crate::svg::{escape, lit, SvgBuilder};
use crate::traits::{Frame, Motion, Widget, WidgetError};

const NAME: &str = "SeriesAndGate";
const WIRE_Y: f64 = 95.0;
const OUTPUT_X: f64 = 535.0;
const GLOW: &str = "series-glow";

const DASH: DashSpec = DashSpec {
    interval_ms: 40,
    step: 2,
    period: 24,
};

#[derive(Debug, Clone, Default)]
pub struct SeriesAndGate {
    inputs: AndInputs,
}

impl SeriesAndGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> AndInputs {
        self.inputs
    }

    fn switch(svg: &mut SvgBuilder, action: &str, pivot: f64, closed: bool, live: bool) {
        let contact = pivot + 80.0;
        let arm_end = if closed {
            (contact, WIRE_Y)
        } else {
            (contact - 12.0, 50.0)
        };

        svg.open_action(action)
            .hit_area(pivot - 20.0, 30.0, 120.0, 90.0)
            .text(
                (pivot + 40.0, 40.0),
                24,
                &lit("label", closed),
                &action.to_uppercase(),
            )
            .circle((pivot, WIRE_Y), 8.0, &lit("pivot", live))
            .circle((contact, WIRE_Y), 6.0, &lit("contact", closed && live))
            .line((pivot, WIRE_Y), arm_end, &lit("arm", closed), 4.0)
            .close_group();
    }

    fn status_card(label: &str, value: &str, on: bool) -> String {
        format!(
            r#"<div class="{}"><span class="status-label">{}</span><span class="status-value">{}</span></div>"#,
            lit("status-card", on),
            escape(label),
            escape(value)
        )
    }

    fn status_panel(&self) -> String {
        let AndInputs { a, b } = self.inputs;
        let out = self.inputs.output();
        let switch_state = |closed: bool| if closed { "CLOSED" } else { "OPEN" };

        format!(
            r#"<div class="status-panel">{}{}{}</div><p class="{}">A AND B = {}</p>"#,
            Self::status_card("Switch A", switch_state(a), a),
            Self::status_card("Switch B", switch_state(b), b),
            Self::status_card("Output", if out { "ON" } else { "OFF" }, out),
            lit("expression", out),
            if out { "TRUE" } else { "FALSE" }
        )
    }
}

impl Widget for SeriesAndGate {
    fn name(&self) -> &'static str {
        NAME
    }

    fn hint(&self) -> &'static str {
        "Click the switches to toggle them"
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

    fn is_animating(&self) -> bool {
        self.inputs.output()
    }

    fn motion(&self) -> Motion {
        Motion::Dash(DASH)
    }

    fn state_key(&self) -> String {
        self.inputs.key()
    }

    fn render(&self, frame: &Frame<'_>) -> String {
        let AndInputs { a, b } = self.inputs;
        let out = self.inputs.output();
        let offset = frame.dash_offset;

        let mut svg = SvgBuilder::new(600, 160);
        svg.glow_filter(GLOW, 4.0, 200, 2);

        svg.open_group("source")
            .line((25.0, 75.0), (25.0, 115.0), "terminal", 3.0)
            .line((35.0, 82.0), (35.0, 108.0), "terminal", 2.0)
            .text((25.0, 65.0), 14, "terminal-label", "+")
            .close_group();

        svg.line((45.0, WIRE_Y), (110.0, WIRE_Y), "wire", 3.0)
            .line((190.0, WIRE_Y), (310.0, WIRE_Y), "wire", 3.0)
            .line((390.0, WIRE_Y), (520.0, WIRE_Y), "wire", 3.0);

        svg.dashed_line((45.0, WIRE_Y), (110.0, WIRE_Y), "current", offset);
        if a {
            svg.dashed_line((190.0, WIRE_Y), (310.0, WIRE_Y), "current", offset);
        }
        if out {
            svg.dashed_line((390.0, WIRE_Y), (520.0, WIRE_Y), "current", offset);
        }

        Self::switch(&mut svg, "a", 110.0, a, true);
        Self::switch(&mut svg, "b", 310.0, b, a);

        if out {
            svg.glowing_circle((OUTPUT_X, WIRE_Y), 15.0, "output is-on", GLOW);
        } else {
            svg.circle((OUTPUT_X, WIRE_Y), 15.0, "output");
        }
        svg.text((555.0, 102.0), 14, &lit("label", out), "Out");

        format!(
            r#"<div class="circuit-frame">{}{}<p class="widget-hint">{}</p></div>"#,
            svg.finish(),
            self.status_panel(),
            escape(self.hint())
        )
    }

    fn boxed_clone(&self) -> Box<dyn Widget> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashed_segments(markup: &str) -> usize {
        markup.matches("data-dash").count()
    }

    #[test]
    fn current_reaches_as_far_as_closed_switches() {
        let mut widget = SeriesAndGate::new();
        assert_eq!(dashed_segments(&widget.render(&Frame::still())), 1);

        widget.apply("b").unwrap();
        assert_eq!(dashed_segments(&widget.render(&Frame::still())), 1);

        widget.apply("a").unwrap();
        assert_eq!(dashed_segments(&widget.render(&Frame::still())), 3);

        widget.apply("b").unwrap();
        assert_eq!(dashed_segments(&widget.render(&Frame::still())), 2);
    }

    #[test]
    fn status_panel_follows_state() {
        let mut widget = SeriesAndGate::new();
        let markup = widget.render(&Frame::still());
        assert!(markup.contains("A AND B = FALSE"));
        assert!(markup.contains(r#"<span class="status-value">OPEN</span>"#));
        assert!(markup.contains(r#"<span class="status-value">OFF</span>"#));

        widget.apply("a").unwrap();
        widget.apply("b").unwrap();
        let markup = widget.render(&Frame::still());
        assert!(markup.contains("A AND B = TRUE"));
        assert!(markup.contains(r#"<span class="status-value">ON</span>"#));
        assert!(!markup.contains(r#"<span class="status-value">OPEN</span>"#));
    }

    #[test]
    fn arms_swing_to_contacts() {
        let mut widget = SeriesAndGate::new();
        let markup = widget.render(&Frame::still());
        assert!(markup.contains(r#"<line x1="110" y1="95" x2="178" y2="50""#));

        widget.apply("a").unwrap();
        let markup = widget.render(&Frame::still());
        assert!(markup.contains(r#"<line x1="110" y1="95" x2="190" y2="95" class="arm is-on""#));
    }

    #[test]
    fn only_animates_when_output_is_on() {
        let mut widget = SeriesAndGate::new();
        widget.apply("a").unwrap();
        assert!(!widget.is_animating());

        widget.apply("b").unwrap();
        assert!(widget.is_animating());
    }
}
