//! Presentation Boundary
//!
//! Presentation is outside the engine, but several values a renderer shows
//! are derived from the data model by fixed rules. They live here so every
//! presenter gets identical semantics:
//!
//! - Option lists, inline or bound, with `excludeBinding` applied
//! - Date bounds (`"today"` or a bound ISO date)
//! - Stepper values clamped into `[min, max]` (defaults 0 and 99)
//! - Checkbox-group selection toggling
//! - Text content and list items
//!
//! A [`Presenter`] receives a [`SurfaceView`]: the visibility-filtered tree
//! plus read access to the data model. Edits flow back through
//! [`Engine::update_value`](crate::engine::Engine::update_value) and clicks
//! through [`Engine::handle_action`](crate::engine::Engine::handle_action).

use chrono::NaiveDate;
use serde_json::Value;

use crate::component::{ChoiceOption, ComponentKind, DateBound, OptionsSource};
use crate::data_model::DataModel;
use crate::registry::{Surface, SurfaceId};
use crate::store::ResolvedNode;

/// Stepper lower bound when none is declared
pub const STEPPER_DEFAULT_MIN: f64 = 0.0;
/// Stepper upper bound when none is declared
pub const STEPPER_DEFAULT_MAX: f64 = 99.0;

/// Choice pickers with at most this many options render as radio buttons
pub const RADIO_MAX_OPTIONS: usize = 3;

/// Options offered by a choice component
///
/// Bound lists that are missing or not arrays resolve to no options, and
/// entries without a string `value` and `label` are skipped. For a
/// `ChoicePicker` with `excludeBinding`, the option equal to the excluded
/// bound value is removed.
#[must_use]
pub fn resolve_options(kind: &ComponentKind, model: &DataModel) -> Vec<ChoiceOption> {
    let mut options = match kind.options() {
        Some(OptionsSource::Inline(options)) => options.clone(),
        Some(OptionsSource::Bound(path)) => model
            .get(path)
            .map(ChoiceOption::list_from_value)
            .unwrap_or_default(),
        None => Vec::new(),
    };

    if let ComponentKind::ChoicePicker {
        exclude_binding: Some(exclude),
        ..
    } = kind
    {
        if let Some(Value::String(excluded)) = model.get(exclude) {
            if !excluded.is_empty() {
                options.retain(|option| &option.value != excluded);
            }
        }
    }

    options
}

/// How a choice picker should be drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceStyle {
    /// Inline radio buttons
    Radio,
    /// A dropdown list
    Dropdown,
}

/// Pick the style for a choice picker showing `option_count` options
#[must_use]
pub fn choice_style(kind: &ComponentKind, option_count: usize) -> ChoiceStyle {
    match kind {
        ComponentKind::ChoicePicker {
            mode: Some(mode), ..
        } if mode == "single" && option_count <= RADIO_MAX_OPTIONS => ChoiceStyle::Radio,
        _ => ChoiceStyle::Dropdown,
    }
}

/// Resolve a date bound to an ISO `YYYY-MM-DD` string
///
/// A path bound resolves only to a non-empty string value.
#[must_use]
pub fn resolve_date_bound(bound: &DateBound, model: &DataModel, today: NaiveDate) -> Option<String> {
    match bound {
        DateBound::Today => Some(today.format("%Y-%m-%d").to_string()),
        DateBound::Path(path) => match model.get(path) {
            Some(Value::String(date)) if !date.is_empty() => Some(date.clone()),
            _ => None,
        },
    }
}

/// Today's local date
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn stepper_bounds(kind: &ComponentKind) -> (f64, f64) {
    match kind {
        ComponentKind::Stepper { min, max, .. } => (
            min.unwrap_or(STEPPER_DEFAULT_MIN),
            max.unwrap_or(STEPPER_DEFAULT_MAX),
        ),
        _ => (STEPPER_DEFAULT_MIN, STEPPER_DEFAULT_MAX),
    }
}

/// Current stepper value: the bound number, else the minimum
#[must_use]
pub fn stepper_value(kind: &ComponentKind, model: &DataModel) -> f64 {
    let (min, _) = stepper_bounds(kind);
    kind.binding()
        .and_then(|binding| model.get(binding))
        .and_then(Value::as_f64)
        .unwrap_or(min)
}

/// Move a stepper value by `delta`, clamped into its bounds
#[must_use]
pub fn stepper_step(kind: &ComponentKind, current: f64, delta: f64) -> f64 {
    let (min, max) = stepper_bounds(kind);
    if min > max {
        return min;
    }
    (current + delta).clamp(min, max)
}

/// Whether a stepper can still move in the direction of `delta`
#[must_use]
pub fn stepper_can_step(kind: &ComponentKind, current: f64, delta: f64) -> bool {
    let (min, max) = stepper_bounds(kind);
    if delta < 0.0 {
        current > min
    } else {
        current < max
    }
}

/// Values currently selected in a checkbox group
#[must_use]
pub fn selected_values(kind: &ComponentKind, model: &DataModel) -> Vec<String> {
    match kind.binding().and_then(|binding| model.get(binding)) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Toggle `value` in a selection, appending when absent
#[must_use]
pub fn toggle_selection(current: &[String], value: &str) -> Vec<String> {
    if current.iter().any(|selected| selected == value) {
        current
            .iter()
            .filter(|selected| *selected != value)
            .cloned()
            .collect()
    } else {
        let mut next = current.to_vec();
        next.push(value.to_string());
        next
    }
}

/// Display string for a bound value
#[must_use]
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Text shown by a `Text` component
///
/// Non-empty literal text wins; otherwise the bound value is shown.
#[must_use]
pub fn text_content(kind: &ComponentKind, model: &DataModel) -> String {
    match kind {
        ComponentKind::Text {
            text: Some(text), ..
        } if !text.is_empty() => text.clone(),
        ComponentKind::Text {
            binding: Some(binding),
            ..
        } => display_value(model.get(binding)),
        _ => String::new(),
    }
}

/// Items of a `List` component: the bound array, or nothing
#[must_use]
pub fn list_items<'m>(kind: &ComponentKind, model: &'m DataModel) -> &'m [Value] {
    match kind {
        ComponentKind::List {
            binding: Some(binding),
            ..
        } => match model.get(binding) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    }
}

/// Action raised when a list item is selected: `select-item-{id}`
#[must_use]
pub fn list_item_action(item: &Value) -> Option<String> {
    match item.get("id")? {
        Value::Null => None,
        id => Some(format!("select-item-{}", display_value(Some(id)))),
    }
}

/// Glyph for a named icon; unknown names get a bullet
#[must_use]
pub fn icon_glyph(name: Option<&str>) -> &'static str {
    match name.unwrap_or_default() {
        "airplane" => "✈️",
        "hotel" => "🏨",
        "car" => "🚗",
        "package" => "📦",
        "search" => "🔍",
        "swap" => "🔄",
        "check-circle" => "✅",
        _ => "•",
    }
}

/// What a presenter renders for one surface
#[derive(Clone, Debug)]
pub struct SurfaceView<'a> {
    /// Surface being shown
    pub surface_id: &'a SurfaceId,
    /// Visibility-filtered tree; `None` renders as empty
    pub tree: Option<ResolvedNode<'a>>,
    /// Data model for bound values
    pub data_model: &'a DataModel,
}

impl<'a> SurfaceView<'a> {
    /// Build the view of a surface
    #[must_use]
    pub fn new(surface: &'a Surface) -> Self {
        Self {
            surface_id: &surface.id,
            tree: surface.visible_tree(),
            data_model: surface.data_model(),
        }
    }

    /// Value bound by a component, if any
    #[must_use]
    pub fn bound_value(&self, kind: &ComponentKind) -> Option<&'a Value> {
        kind.binding().and_then(|binding| self.data_model.get(binding))
    }

    /// Whether nothing is rendered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }
}

/// Renders surface views
pub trait Presenter {
    /// Render one surface
    fn present(&mut self, view: &SurfaceView<'_>);
}
