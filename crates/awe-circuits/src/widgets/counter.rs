//! Plain increment/decrement counter.

use crate::svg::escape;
use crate::traits::{Frame, Widget, WidgetError};

const NAME: &str = "Counter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    label: String,
    count: i64,
}

impl Counter {
    pub fn new(initial_value: i64, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            count: initial_value,
        }
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new(0, "Count")
    }
}

impl Widget for Counter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn hint(&self) -> &'static str {
        ""
    }

    fn actions(&self) -> &'static [&'static str] {
        &["decrement", "increment"]
    }

    fn apply(&mut self, action: &str) -> Result<(), WidgetError> {
        match action {
            "decrement" => self.count = self.count.saturating_sub(1),
            "increment" => self.count = self.count.saturating_add(1),
            _ => {
                return Err(WidgetError::UnknownAction {
                    widget: NAME,
                    action: action.to_string(),
                })
            }
        }
        Ok(())
    }

    fn state_key(&self) -> String {
        self.count.to_string()
    }

    fn is_finite(&self) -> bool {
        false
    }

    fn render(&self, _frame: &Frame<'_>) -> String {
        format!(
            r#"<div class="counter" data-initial="{count}"><span class="counter-label">{label}</span><div class="counter-controls"><button type="button" data-action="decrement" aria-label="Decrement">-</button><span class="counter-value" data-count="">{count}</span><button type="button" data-action="increment" aria-label="Increment">+</button></div></div>"#,
            count = self.count,
            label = escape(&self.label)
        )
    }

    fn boxed_clone(&self) -> Box<dyn Widget> {
        Box::new(self.clone())
    }
}
