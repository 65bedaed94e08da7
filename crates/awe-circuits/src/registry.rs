//! Widget registry for looking up widgets by the name used in essays.

use std::collections::{BTreeMap, HashMap};

use awe_content::PropValue;

use crate::generator::{generate_web_component, GeneratedWidget};
use crate::traits::{Widget, WidgetError};
use crate::widgets::{Counter, SeriesAndGate, SwitchAndGate, SwitchAndTransistor, TransistorAndGate};

/// Props passed to a widget factory.
pub type Props = BTreeMap<String, PropValue>;

/// Builds a widget from its tag props.
pub type WidgetFactory = fn(&Props) -> Result<Box<dyn Widget>, WidgetError>;

/// A registry of widget factories.
#[derive(Debug, Default, Clone)]
pub struct WidgetRegistry {
    /// Factories by name (lowercase)
    widgets: HashMap<String, RegisteredWidget>,
}

#[derive(Debug, Clone)]
struct RegisteredWidget {
    name: &'static str,
    factory: WidgetFactory,
}

impl WidgetRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in widget.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("SwitchAndGate", |_| Ok(Box::new(SwitchAndGate::new())));
        registry.register("SeriesAndGate", |_| Ok(Box::new(SeriesAndGate::new())));
        registry.register("TransistorAndGate", |_| {
            Ok(Box::new(TransistorAndGate::new()))
        });
        registry.register("SwitchAndTransistor", |_| {
            Ok(Box::new(SwitchAndTransistor::new()))
        });
        registry.register("Counter", counter);
        registry
    }

    /// Register a widget under `name`. Lookup is case-insensitive.
    pub fn register(&mut self, name: &'static str, factory: WidgetFactory) {
        self.widgets
            .insert(name.to_lowercase(), RegisteredWidget { name, factory });
    }

    /// Check if a widget exists.
    pub fn contains(&self, name: &str) -> bool {
        self.widgets.contains_key(&name.to_lowercase())
    }

    /// Get all registered widget names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.widgets.values().map(|w| w.name).collect();
        names.sort_unstable();
        names
    }

    /// Instantiate a widget from its tag props.
    pub fn create(&self, name: &str, props: &Props) -> Result<Box<dyn Widget>, WidgetError> {
        let entry = self
            .widgets
            .get(&name.to_lowercase())
            .ok_or_else(|| WidgetError::UnknownWidget(name.to_string()))?;
        (entry.factory)(props)
    }

    /// Instantiate a widget and generate its custom element.
    pub fn generate(&self, name: &str, props: &Props) -> Result<GeneratedWidget, WidgetError> {
        let widget = self.create(name, props)?;
        generate_web_component(widget.as_ref(), &tag_name(widget.name()))
    }
}

/// Custom element name for a widget, e.g. `SwitchAndGate` -> `awe-switch-and-gate`.
pub fn tag_name(widget: &str) -> String {
    let mut tag = String::from("awe");
    for c in widget.chars() {
        if c.is_ascii_uppercase() {
            tag.push('-');
            tag.push(c.to_ascii_lowercase());
        } else {
            tag.push(c);
        }
    }
    tag
}

fn counter(props: &Props) -> Result<Box<dyn Widget>, WidgetError> {
    let initial = match props.get("initialValue") {
        None => 0,
        Some(value) => value.as_i64().ok_or_else(|| WidgetError::InvalidProp {
            widget: "Counter",
            prop: "initialValue".to_string(),
            message: "expected an integer".to_string(),
        })?,
    };

    let label = match props.get("label") {
        None => "Count",
        Some(value) => value.as_str().ok_or_else(|| WidgetError::InvalidProp {
            widget: "Counter",
            prop: "label".to_string(),
            message: "expected a string".to_string(),
        })?,
    };

    Ok(Box::new(Counter::new(initial, label)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Frame;
    use pretty_assertions::assert_eq;

    fn props(pairs: &[(&str, PropValue)]) -> Props {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn builtin_widgets_are_registered() {
        let registry = WidgetRegistry::builtin();

        assert_eq!(
            registry.names(),
            vec![
                "Counter",
                "SeriesAndGate",
                "SwitchAndGate",
                "SwitchAndTransistor",
                "TransistorAndGate"
            ]
        );
        assert!(registry.contains("switchandgate"));
    }

    #[test]
    fn unknown_widget_is_an_error() {
        let registry = WidgetRegistry::builtin();
        let result = registry.create("FluxCapacitor", &Props::new());

        assert!(matches!(result, Err(WidgetError::UnknownWidget(name)) if name == "FluxCapacitor"));
    }

    #[test]
    fn counter_reads_props() {
        let registry = WidgetRegistry::builtin();
        let widget = registry
            .create(
                "Counter",
                &props(&[
                    ("initialValue", PropValue::Expression("7".to_string())),
                    ("label", PropValue::String("Votes".to_string())),
                    ("client:load", PropValue::Boolean(true)),
                ]),
            )
            .unwrap();

        assert_eq!(widget.state_key(), "7");
        assert!(widget.render(&Frame::still()).contains("Votes"));
    }

    #[test]
    fn counter_rejects_bad_initial_value() {
        let registry = WidgetRegistry::builtin();
        let result = registry.create(
            "Counter",
            &props(&[("initialValue", PropValue::Expression("count + 1".to_string()))]),
        );

        assert!(matches!(result, Err(WidgetError::InvalidProp { .. })));
    }

    #[test]
    fn tag_names_are_kebab_case() {
        assert_eq!(tag_name("SwitchAndGate"), "awe-switch-and-gate");
        assert_eq!(tag_name("Counter"), "awe-counter");
    }

    #[test]
    fn generates_custom_element() {
        let registry = WidgetRegistry::builtin();
        let generated = registry
            .generate("TransistorAndGate", &Props::new())
            .unwrap();

        assert_eq!(generated.tag_name, "awe-transistor-and-gate");
        assert!(generated.markup.contains("click A or B to apply voltage"));
    }
}
