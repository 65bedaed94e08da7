//! Built-in diagram widgets.

mod counter;
mod series_and_gate;
mod switch_and_gate;
mod switch_and_transistor;
mod transistor_and_gate;

pub use counter::Counter;
pub use series_and_gate::SeriesAndGate;
pub use switch_and_gate::SwitchAndGate;
pub use switch_and_transistor::SwitchAndTransistor;
pub use transistor_and_gate::TransistorAndGate;

use std::fmt::Write;

use crate::geometry::MotionPath;
use crate::svg::{escape, lit, num, SvgBuilder, Xy};
use crate::traits::{Frame, WidgetError};

/// Two inputs feeding an AND gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AndInputs {
    pub a: bool,
    pub b: bool,
}

impl AndInputs {
    /// Actions understood by every two-input gate.
    pub const ACTIONS: &'static [&'static str] = &["a", "b"];

    /// Flip the named input.
    pub fn toggle(&mut self, widget: &'static str, action: &str) -> Result<(), WidgetError> {
        match action {
            "a" => self.a = !self.a,
            "b" => self.b = !self.b,
            _ => {
                return Err(WidgetError::UnknownAction {
                    widget,
                    action: action.to_string(),
                })
            }
        }
        Ok(())
    }

    pub fn output(&self) -> bool {
        self.a && self.b
    }

    pub fn key(&self) -> String {
        format!("a{}b{}", u8::from(self.a), u8::from(self.b))
    }
}

/// Draw live particles into a layer the client script can redraw.
fn particle_layer(svg: &mut SvgBuilder, frame: &Frame<'_>, lanes: &[MotionPath], filter: &str) {
    let mut layer = format!(r#"<g data-particles="" data-filter="{}">"#, filter);
    for particle in frame.particles {
        let Some(path) = lanes.get(particle.lane) else {
            continue;
        };
        let pos = path.point_at(particle.progress);
        let _ = write!(
            layer,
            r#"<circle cx="{}" cy="{}" r="4" class="particle" filter="url(#{})" opacity="{}"/>"#,
            num(pos.x),
            num(pos.y),
            filter,
            num(particle.opacity())
        );
    }
    layer.push_str("</g>");
    svg.raw(&layer);
}

/// The `A ∧ B = x` line under a gate diagram.
fn expression(svg: &mut SvgBuilder, at: Xy, inputs: AndInputs) {
    let out = inputs.output();
    svg.raw(&format!(
        r#"<text x="{}" y="{}" font-size="13" text-anchor="middle" class="expression"><tspan class="{}">A</tspan><tspan> ∧ </tspan><tspan class="{}">B</tspan><tspan> = </tspan><tspan class="{}" font-weight="{}">{}</tspan></text>"#,
        num(at.0),
        num(at.1),
        lit("term", inputs.a),
        lit("term", inputs.b),
        lit("result", out),
        if out { 600 } else { 400 },
        u8::from(out)
    ));
}

/// Battery symbol with its positive terminal wire.
fn battery(svg: &mut SvgBuilder, x: f64, y: f64, wire_to: f64) {
    svg.open_group("source")
        .line((x, y - 15.0), (x, y + 15.0), "terminal", 3.0)
        .line((x + 10.0, y - 10.0), (x + 10.0, y + 10.0), "terminal", 2.0)
        .line((x + 10.0, y), (wire_to, y), "terminal", 2.0)
        .text((x, y - 22.0), 12, "terminal-label", "+")
        .close_group();
}

/// Wrap a diagram with its interaction hint.
fn framed(svg: String, hint: &str) -> String {
    format!(
        r#"<div class="circuit-frame">{}<p class="widget-hint">{}</p></div>"#,
        svg,
        escape(hint)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_inputs_truth_table() {
        let mut inputs = AndInputs::default();
        assert!(!inputs.output());

        inputs.toggle("Test", "a").unwrap();
        assert!(!inputs.output());
        assert_eq!(inputs.key(), "a1b0");

        inputs.toggle("Test", "b").unwrap();
        assert!(inputs.output());

        inputs.toggle("Test", "a").unwrap();
        assert!(!inputs.output());
        assert_eq!(inputs.key(), "a0b1");

        assert!(inputs.toggle("Test", "c").is_err());
    }

    #[test]
    fn expression_reflects_inputs() {
        let mut svg = SvgBuilder::new(10, 10);
        expression(&mut svg, (0.0, 0.0), AndInputs { a: true, b: true });
        let markup = svg.finish();

        assert!(markup.contains(r#"<tspan class="result is-on" font-weight="600">1</tspan>"#));
    }
}
