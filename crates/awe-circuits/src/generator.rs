//! Web Component code generator.
//!
//! Finite widgets are explored ahead of time: every reachable state is
//! rendered to markup and the generated element swaps between them on
//! click. Only particles and dash offsets are computed in the browser.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

use crate::traits::{Frame, Widget, WidgetError};

/// Upper bound on pre-rendered states per widget.
pub const MAX_STATES: usize = 64;

/// A widget ready to embed in a page.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedWidget {
    /// Custom element name (e.g., "awe-switch-and-gate")
    pub tag_name: String,

    /// Module script defining the custom element. Identical for every
    /// instance of the same widget type.
    pub script: String,

    /// Server-rendered element, usable without JavaScript
    pub markup: String,
}

/// Every reachable state of a finite widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateTable {
    pub initial: String,
    /// Markup per state key
    pub states: BTreeMap<String, String>,
    /// Next state per state key and action
    pub transitions: BTreeMap<String, BTreeMap<String, String>>,
    /// Lanes spawning particles per state key
    pub lanes: BTreeMap<String, Vec<usize>>,
    /// States in which the redraw loop runs
    pub animating: Vec<String>,
}

impl StateTable {
    /// Explore the widget's states breadth-first from its current state.
    pub fn explore(widget: &dyn Widget) -> Result<Self, WidgetError> {
        let mut table = StateTable {
            initial: widget.state_key(),
            ..Default::default()
        };

        let mut queue = VecDeque::from([widget.boxed_clone()]);
        table
            .states
            .insert(table.initial.clone(), widget.render(&Frame::still()));

        while let Some(current) = queue.pop_front() {
            let key = current.state_key();
            if current.is_animating() {
                table.animating.push(key.clone());
            }
            table.lanes.insert(key.clone(), current.active_lanes());

            let mut edges = BTreeMap::new();
            for &action in current.actions() {
                let mut next = current.boxed_clone();
                next.apply(action)?;
                let next_key = next.state_key();

                if !table.states.contains_key(&next_key) {
                    if table.states.len() >= MAX_STATES {
                        return Err(WidgetError::StateSpace {
                            widget: widget.name(),
                            limit: MAX_STATES,
                        });
                    }
                    table
                        .states
                        .insert(next_key.clone(), next.render(&Frame::still()));
                    queue.push_back(next);
                }
                edges.insert(action.to_string(), next_key);
            }
            table.transitions.insert(key, edges);
        }

        Ok(table)
    }
}

/// Generate the custom element for a widget instance.
pub fn generate_web_component(
    widget: &dyn Widget,
    tag_name: &str,
) -> Result<GeneratedWidget, WidgetError> {
    let (script, state_attr) = if widget.is_finite() {
        let table = StateTable::explore(widget)?;
        let script = state_machine_script(tag_name, widget, &table)?;
        (script, format!(r#" data-state="{}""#, table.initial))
    } else {
        (counter_script(tag_name), String::new())
    };

    let markup = format!(
        r#"<{tag}{state_attr}>{body}</{tag}>"#,
        tag = tag_name,
        state_attr = state_attr,
        body = widget.render(&Frame::still())
    );

    Ok(GeneratedWidget {
        tag_name: tag_name.to_string(),
        script,
        markup,
    })
}

/// Serialize a value for inlining in a script element.
fn to_js<T: Serialize>(value: &T) -> Result<String, WidgetError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn state_machine_script(
    tag_name: &str,
    widget: &dyn Widget,
    table: &StateTable,
) -> Result<String, WidgetError> {
    let class_name = to_pascal_case(tag_name);

    Ok(format!(
        r#"/**
 * {class_name} - {name} diagram
 * Tag: <{tag_name}>
 */

const TABLE = {table};
const MOTION = {motion};
const CUTOFF = 1.1;

const opacity = (p) => (p < 0.1 ? p * 10 : p > 0.9 ? Math.max(0, (1 - p) * 10) : 1);

function pointAt(path, progress) {{
  const w = path.waypoints;
  if (w.length === 1 || progress <= w[0].at) return w[0].point;
  let i = w.findIndex((_, j) => j > 0 && progress < w[j].at) - 1;
  if (i < 0) i = w.length - 2;
  const a = w[i], b = w[i + 1];
  const span = b.at - a.at;
  if (span <= 0) return b.point;
  const t = (progress - a.at) / span;
  return {{ x: a.point.x + t * (b.point.x - a.point.x), y: a.point.y + t * (b.point.y - a.point.y) }};
}}

class {class_name} extends HTMLElement {{
  #state = TABLE.initial;
  #frame = null;
  #particles = [];
  #lastSpawn = [];
  #nextId = 0;
  #dash = 0;
  #lastDash = null;

  connectedCallback() {{
    const saved = this.dataset.state;
    if (saved && saved in TABLE.states) this.#state = saved;
    this.addEventListener('click', this.#onClick);
    this.addEventListener('keydown', this.#onKey);
    this.#render();
    this.#sync();
  }}

  disconnectedCallback() {{
    this.removeEventListener('click', this.#onClick);
    this.removeEventListener('keydown', this.#onKey);
    this.#stop();
  }}

  #onClick = (event) => {{
    const target = event.target.closest('[data-action]');
    if (target && this.contains(target)) this.#apply(target.dataset.action);
  }};

  #onKey = (event) => {{
    if (event.key !== 'Enter' && event.key !== ' ') return;
    const target = event.target.closest('[data-action]');
    if (!target || !this.contains(target)) return;
    event.preventDefault();
    this.#apply(target.dataset.action);
  }};

  #apply(action) {{
    const next = TABLE.transitions[this.#state]?.[action];
    if (next === undefined) return;
    this.#state = next;
    this.dataset.state = next;
    this.#render(action);
    this.#sync();
  }}

  #render(focusAction) {{
    this.innerHTML = TABLE.states[this.#state];
    if (focusAction) this.querySelector(`[data-action="${{focusAction}}"]`)?.focus();
    this.#draw();
  }}

  #sync() {{
    const animating = TABLE.animating.includes(this.#state);
    if (animating && this.#frame === null) {{
      this.#frame = requestAnimationFrame(this.#tick);
    }} else if (!animating && this.#frame !== null) {{
      this.#stop();
    }}
  }}

  #stop() {{
    if (this.#frame !== null) cancelAnimationFrame(this.#frame);
    this.#frame = null;
    this.#particles = [];
    this.#lastSpawn = [];
    this.#lastDash = null;
    this.#draw();
  }}

  #tick = (now) => {{
    if (MOTION.kind === 'particles') {{
      for (const p of this.#particles) p.progress += MOTION.spec.step;
      this.#particles = this.#particles.filter((p) => p.progress < CUTOFF);
      for (const lane of TABLE.lanes[this.#state] ?? []) {{
        const last = this.#lastSpawn[lane];
        if (last === undefined || now - last > MOTION.spec.spawnIntervalMs) {{
          this.#lastSpawn[lane] = now;
          this.#particles.push({{ id: ++this.#nextId, lane, progress: 0 }});
        }}
      }}
    }} else if (MOTION.kind === 'dash') {{
      if (this.#lastDash === null) {{
        this.#lastDash = now;
      }} else {{
        while (now - this.#lastDash >= MOTION.intervalMs) {{
          this.#dash = (this.#dash + MOTION.step) % MOTION.period;
          this.#lastDash += MOTION.intervalMs;
        }}
      }}
    }}
    this.#draw();
    this.#frame = requestAnimationFrame(this.#tick);
  }};

  #draw() {{
    if (MOTION.kind === 'dash') {{
      for (const line of this.querySelectorAll('[data-dash]')) {{
        line.setAttribute('stroke-dashoffset', String(-this.#dash));
      }}
      return;
    }}
    const layer = this.querySelector('[data-particles]');
    if (!layer || MOTION.kind !== 'particles') return;
    const filter = layer.dataset.filter;
    layer.innerHTML = this.#particles
      .map((p) => {{
        const pos = pointAt(MOTION.lanes[p.lane], p.progress);
        return `<circle cx="${{pos.x}}" cy="${{pos.y}}" r="4" class="particle" filter="url(#${{filter}})" opacity="${{opacity(p.progress)}}"/>`;
      }})
      .join('');
  }}
}}

if (typeof customElements !== 'undefined' && !customElements.get('{tag_name}')) {{
  customElements.define('{tag_name}', {class_name});
}}
"#,
        class_name = class_name,
        name = widget.name(),
        tag_name = tag_name,
        table = to_js(table)?,
        motion = to_js(&widget.motion())?,
    ))
}

fn counter_script(tag_name: &str) -> String {
    let class_name = to_pascal_case(tag_name);

    format!(
        r#"/**
 * {class_name} - counter
 * Tag: <{tag_name}>
 */

class {class_name} extends HTMLElement {{
  #count = 0;

  connectedCallback() {{
    const root = this.querySelector('[data-initial]');
    this.#count = Number.parseInt(root?.dataset.initial ?? '0', 10) || 0;
    this.addEventListener('click', this.#onClick);
    this.#render();
  }}

  disconnectedCallback() {{
    this.removeEventListener('click', this.#onClick);
  }}

  #onClick = (event) => {{
    const target = event.target.closest('[data-action]');
    if (!target || !this.contains(target)) return;
    if (target.dataset.action === 'increment') this.#count += 1;
    if (target.dataset.action === 'decrement') this.#count -= 1;
    this.#render();
  }};

  #render() {{
    const value = this.querySelector('[data-count]');
    if (value) value.textContent = String(this.#count);
  }}
}}

if (typeof customElements !== 'undefined' && !customElements.get('{tag_name}')) {{
  customElements.define('{tag_name}', {class_name});
}}
"#,
        class_name = class_name,
        tag_name = tag_name,
    )
}

/// Convert kebab-case to PascalCase.
fn to_pascal_case(s: &str) -> String {
    s.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Counter, SeriesAndGate, SwitchAndGate, SwitchAndTransistor};
    use pretty_assertions::assert_eq;

    #[test]
    fn to_pascal_case_works() {
        assert_eq!(to_pascal_case("awe-switch-and-gate"), "AweSwitchAndGate");
        assert_eq!(to_pascal_case("simple"), "Simple");
    }

    #[test]
    fn explores_all_and_gate_states() {
        let table = StateTable::explore(&SwitchAndGate::new()).unwrap();

        assert_eq!(table.initial, "a0b0");
        assert_eq!(
            table.states.keys().collect::<Vec<_>>(),
            vec!["a0b0", "a0b1", "a1b0", "a1b1"]
        );
        assert_eq!(table.transitions["a0b0"]["a"], "a1b0");
        assert_eq!(table.transitions["a1b1"]["b"], "a1b0");
        assert_eq!(table.animating, vec!["a1b1".to_string()]);
        assert_eq!(table.lanes["a1b1"], vec![0]);
        assert!(table.lanes["a1b0"].is_empty());
    }

    #[test]
    fn explores_independent_lanes() {
        let table = StateTable::explore(&SwitchAndTransistor::new()).unwrap();

        assert_eq!(table.states.len(), 4);
        assert_eq!(table.animating.len(), 3);
        assert_eq!(table.lanes["s1t1"], vec![0, 1]);
    }

    #[test]
    fn generates_state_machine_element() {
        let generated = generate_web_component(&SwitchAndGate::new(), "awe-switch-and-gate").unwrap();

        assert_eq!(generated.tag_name, "awe-switch-and-gate");
        assert!(generated.script.contains("class AweSwitchAndGate extends HTMLElement"));
        assert!(generated.script.contains("customElements.define('awe-switch-and-gate'"));
        assert!(generated.script.contains(r#""kind":"particles""#));
        assert!(generated.script.contains(r#""spawnIntervalMs":400.0"#));
        assert!(!generated.script.contains("</svg>"), "closing tags are escaped");
        assert!(generated
            .markup
            .starts_with(r#"<awe-switch-and-gate data-state="a0b0"><div class="circuit-frame">"#));
        assert!(generated.markup.ends_with("</awe-switch-and-gate>"));
    }

    #[test]
    fn dash_widgets_export_dash_timing() {
        let generated = generate_web_component(&SeriesAndGate::new(), "awe-series-and-gate").unwrap();

        assert!(generated.script.contains(r#""kind":"dash","intervalMs":40,"step":2,"period":24"#));
    }

    #[test]
    fn counter_uses_live_script() {
        let generated = generate_web_component(&Counter::new(5, "Taps"), "awe-counter").unwrap();

        assert!(generated.script.contains("class AweCounter extends HTMLElement"));
        assert!(!generated.script.contains("TABLE"));
        assert!(generated.markup.starts_with("<awe-counter><div class=\"counter\" data-initial=\"5\">"));
    }
}
