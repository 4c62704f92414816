//! Component Definitions
//!
//! Components arrive on the wire as one flat record covering every catalog
//! type, with mostly-optional fields. Internally each type is a variant of
//! [`ComponentKind`] carrying only the fields that type consumes, so code that
//! handles a `Stepper` cannot accidentally read a `Button`'s action.
//!
//! # Robustness
//!
//! Decoding is lenient about field shapes: a malformed `children` list,
//! `options` value, numeric bound or text field degrades to "absent" instead
//! of failing the whole `updateComponents` message. Only a missing `id` makes
//! a definition undecodable, and then only that definition is skipped. An unrecognised `component` tag
//! becomes [`ComponentKind::Unknown`], which presentation must render as a
//! visible placeholder.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Reserved id of the component resolved as a surface's tree root
pub const ROOT_ID: &str = "root";

/// One `{value, label}` entry of a choice list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Value written to the binding when selected
    pub value: String,
    /// Text shown to the user
    pub label: String,
}

impl ChoiceOption {
    /// Create an option
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Decode a list of options, skipping entries of the wrong shape
    #[must_use]
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        match value {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| Self::deserialize(item).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Where a choice component gets its options from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionsSource {
    /// Options listed inline in the component definition
    Inline(Vec<ChoiceOption>),
    /// A data-model path whose value is the option list
    Bound(String),
}

impl OptionsSource {
    fn from_wire(value: Value) -> Option<Self> {
        match value {
            Value::String(path) => Some(Self::Bound(path)),
            items @ Value::Array(_) => Some(Self::Inline(ChoiceOption::list_from_value(&items))),
            _ => None,
        }
    }

    fn to_wire(&self) -> Value {
        match self {
            Self::Bound(path) => Value::String(path.clone()),
            Self::Inline(options) => Value::Array(
                options
                    .iter()
                    .map(|o| {
                        let mut entry = Map::new();
                        entry.insert("value".into(), Value::String(o.value.clone()));
                        entry.insert("label".into(), Value::String(o.label.clone()));
                        Value::Object(entry)
                    })
                    .collect(),
            ),
        }
    }
}

/// Lower or upper bound of a date input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateBound {
    /// The current local date at render time
    Today,
    /// A data-model path holding an ISO date string
    Path(String),
}

impl DateBound {
    fn parse(raw: String) -> Self {
        if raw == "today" {
            Self::Today
        } else {
            Self::Path(raw)
        }
    }

    fn to_wire(&self) -> String {
        match self {
            Self::Today => "today".to_string(),
            Self::Path(path) => path.clone(),
        }
    }
}

/// The type-specific part of a component
#[derive(Clone, Debug, PartialEq)]
pub enum ComponentKind {
    /// Vertical container
    Column,
    /// Horizontal container
    Row,
    /// Static or bound text
    Text {
        /// Literal text (takes precedence over `binding`)
        text: Option<String>,
        /// Path whose value is displayed when `text` is absent
        binding: Option<String>,
        /// Presentation style hint
        style: Option<String>,
    },
    /// A named icon
    Icon {
        /// Icon name
        icon: Option<String>,
    },
    /// Clickable container
    Card {
        /// Action raised on click
        action: Option<String>,
    },
    /// Push button
    Button {
        /// Button caption
        label: Option<String>,
        /// Icon shown instead of the caption
        icon: Option<String>,
        /// Action raised on click
        action: Option<String>,
        /// Visual variant hint
        variant: Option<String>,
    },
    /// Single choice from a list
    ChoicePicker {
        /// Field label
        label: Option<String>,
        /// Path receiving the selected value
        binding: Option<String>,
        /// Option list
        options: Option<OptionsSource>,
        /// Presentation mode hint (e.g. `single`)
        mode: Option<String>,
        /// Path whose value is removed from the offered options
        exclude_binding: Option<String>,
        /// Whether the list should be searchable
        searchable: bool,
    },
    /// Date or date-time input
    DateTimeInput {
        /// Field label
        label: Option<String>,
        /// Path receiving the chosen date
        binding: Option<String>,
        /// `date` (default) or `datetime`
        mode: Option<String>,
        /// Earliest selectable date
        min_date: Option<DateBound>,
        /// Latest selectable date
        max_date: Option<DateBound>,
    },
    /// Numeric stepper
    Stepper {
        /// Field label
        label: Option<String>,
        /// Path receiving the number
        binding: Option<String>,
        /// Lower bound
        min: Option<f64>,
        /// Upper bound
        max: Option<f64>,
    },
    /// Single checkbox
    CheckBox {
        /// Checkbox caption
        label: Option<String>,
        /// Path receiving the boolean
        binding: Option<String>,
    },
    /// Free text input
    TextField {
        /// Field label
        label: Option<String>,
        /// Path receiving the text
        binding: Option<String>,
        /// Placeholder hint
        hint: Option<String>,
    },
    /// Multiple choice from a list
    CheckboxGroup {
        /// Group label
        label: Option<String>,
        /// Path receiving the array of selected values
        binding: Option<String>,
        /// Option list
        options: Option<OptionsSource>,
    },
    /// Repeated items from a bound array
    List {
        /// Path of the item array
        binding: Option<String>,
        /// Item template name
        item_template: Option<String>,
    },
    /// A type this client does not know
    Unknown {
        /// The tag as sent by the producer
        type_name: String,
        /// Every non-structural field, preserved verbatim
        props: Map<String, Value>,
    },
}

impl ComponentKind {
    /// The catalog tag for this kind
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Column => "Column",
            Self::Row => "Row",
            Self::Text { .. } => "Text",
            Self::Icon { .. } => "Icon",
            Self::Card { .. } => "Card",
            Self::Button { .. } => "Button",
            Self::ChoicePicker { .. } => "ChoicePicker",
            Self::DateTimeInput { .. } => "DateTimeInput",
            Self::Stepper { .. } => "Stepper",
            Self::CheckBox { .. } => "CheckBox",
            Self::TextField { .. } => "TextField",
            Self::CheckboxGroup { .. } => "CheckboxGroup",
            Self::List { .. } => "List",
            Self::Unknown { type_name, .. } => type_name,
        }
    }

    /// Data-model path this component reads (and, for inputs, writes)
    #[must_use]
    pub fn binding(&self) -> Option<&str> {
        match self {
            Self::Text { binding, .. }
            | Self::ChoicePicker { binding, .. }
            | Self::DateTimeInput { binding, .. }
            | Self::Stepper { binding, .. }
            | Self::CheckBox { binding, .. }
            | Self::TextField { binding, .. }
            | Self::CheckboxGroup { binding, .. }
            | Self::List { binding, .. } => binding.as_deref(),
            Self::Column
            | Self::Row
            | Self::Icon { .. }
            | Self::Card { .. }
            | Self::Button { .. }
            | Self::Unknown { .. } => None,
        }
    }

    /// Action raised when the component is activated
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        match self {
            Self::Card { action } | Self::Button { action, .. } => action.as_deref(),
            _ => None,
        }
    }

    /// Option source of a choice component
    #[must_use]
    pub fn options(&self) -> Option<&OptionsSource> {
        match self {
            Self::ChoicePicker { options, .. } | Self::CheckboxGroup { options, .. } => {
                options.as_ref()
            }
            _ => None,
        }
    }

    /// Field label, if this kind has one
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Button { label, .. }
            | Self::ChoicePicker { label, .. }
            | Self::DateTimeInput { label, .. }
            | Self::Stepper { label, .. }
            | Self::CheckBox { label, .. }
            | Self::TextField { label, .. }
            | Self::CheckboxGroup { label, .. } => label.as_deref(),
            _ => None,
        }
    }

    /// Whether children are laid out by this kind
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Column | Self::Row | Self::Card { .. })
    }

    /// Whether this kind edits its binding
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::ChoicePicker { .. }
                | Self::DateTimeInput { .. }
                | Self::Stepper { .. }
                | Self::CheckBox { .. }
                | Self::TextField { .. }
                | Self::CheckboxGroup { .. }
        )
    }

    /// Whether this is the unknown-type placeholder
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }
}

/// A node definition in a surface's component store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireComponent", into = "WireComponent")]
pub struct Component {
    /// Id, unique within the surface
    pub id: String,
    /// Ordered child ids
    pub children: Vec<String>,
    /// Visibility condition
    pub visible: Option<String>,
    /// Type-specific definition
    pub kind: ComponentKind,
}

impl Component {
    /// Create a component without children or visibility condition
    pub fn new(id: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
            visible: None,
            kind,
        }
    }

    /// Set the ordered child ids
    #[must_use]
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    /// Set the visibility condition
    #[must_use]
    pub fn with_visible(mut self, condition: impl Into<String>) -> Self {
        self.visible = Some(condition.into());
        self
    }

    /// Whether this is the reserved root component
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    /// The catalog tag
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }
}

/// Accept an array of ids, skipping non-string entries; anything else is empty
fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(id) => Some(id),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Accept a string, or the text of a number or boolean; anything else is absent
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    })
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool())
}

/// Flat wire record shared by every component type
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireComponent {
    id: String,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    component: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing)]
    component_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_ids",
        skip_serializing_if = "Vec::is_empty"
    )]
    children: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    visible: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    style: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    action: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    binding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    min_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    max_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    variant: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag", skip_serializing_if = "Option::is_none")]
    searchable: Option<bool>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    exclude_binding: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    item_template: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl WireComponent {
    /// Every non-structural field as a JSON object
    fn props(&self) -> Map<String, Value> {
        let mut props = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for structural in ["id", "component", "children", "visible"] {
            props.remove(structural);
        }
        props
    }
}

fn number(value: Option<Value>) -> Option<f64> {
    value.as_ref().and_then(Value::as_f64)
}

impl From<WireComponent> for Component {
    fn from(wire: WireComponent) -> Self {
        let type_name = wire
            .component
            .clone()
            .or_else(|| wire.component_type.clone())
            .unwrap_or_default();

        let kind = match type_name.as_str() {
            "Column" => ComponentKind::Column,
            "Row" => ComponentKind::Row,
            "Text" => ComponentKind::Text {
                text: wire.text,
                binding: wire.binding,
                style: wire.style,
            },
            "Icon" => ComponentKind::Icon { icon: wire.icon },
            "Card" => ComponentKind::Card {
                action: wire.action,
            },
            "Button" => ComponentKind::Button {
                label: wire.label,
                icon: wire.icon,
                action: wire.action,
                variant: wire.variant,
            },
            "ChoicePicker" => ComponentKind::ChoicePicker {
                label: wire.label,
                binding: wire.binding,
                options: wire.options.and_then(OptionsSource::from_wire),
                mode: wire.mode,
                exclude_binding: wire.exclude_binding,
                searchable: wire.searchable.unwrap_or(false),
            },
            "DateTimeInput" => ComponentKind::DateTimeInput {
                label: wire.label,
                binding: wire.binding,
                mode: wire.mode,
                min_date: wire.min_date.map(DateBound::parse),
                max_date: wire.max_date.map(DateBound::parse),
            },
            "Stepper" => ComponentKind::Stepper {
                label: wire.label,
                binding: wire.binding,
                min: number(wire.min),
                max: number(wire.max),
            },
            "CheckBox" => ComponentKind::CheckBox {
                label: wire.label,
                binding: wire.binding,
            },
            "TextField" => ComponentKind::TextField {
                label: wire.label,
                binding: wire.binding,
                hint: wire.hint,
            },
            "CheckboxGroup" => ComponentKind::CheckboxGroup {
                label: wire.label,
                binding: wire.binding,
                options: wire.options.and_then(OptionsSource::from_wire),
            },
            "List" => ComponentKind::List {
                binding: wire.binding,
                item_template: wire.item_template,
            },
            _ => {
                let props = wire.props();
                return Self {
                    id: wire.id,
                    children: wire.children,
                    visible: wire.visible,
                    kind: ComponentKind::Unknown { type_name, props },
                };
            }
        };

        Self {
            id: wire.id,
            children: wire.children,
            visible: wire.visible,
            kind,
        }
    }
}

impl From<Component> for WireComponent {
    fn from(component: Component) -> Self {
        let mut wire = WireComponent {
            id: component.id,
            component: Some(component.kind.type_name().to_string()),
            children: component.children,
            visible: component.visible,
            ..WireComponent::default()
        };

        match component.kind {
            ComponentKind::Column | ComponentKind::Row => {}
            ComponentKind::Text {
                text,
                binding,
                style,
            } => {
                wire.text = text;
                wire.binding = binding;
                wire.style = style;
            }
            ComponentKind::Icon { icon } => wire.icon = icon,
            ComponentKind::Card { action } => wire.action = action,
            ComponentKind::Button {
                label,
                icon,
                action,
                variant,
            } => {
                wire.label = label;
                wire.icon = icon;
                wire.action = action;
                wire.variant = variant;
            }
            ComponentKind::ChoicePicker {
                label,
                binding,
                options,
                mode,
                exclude_binding,
                searchable,
            } => {
                wire.label = label;
                wire.binding = binding;
                wire.options = options.as_ref().map(OptionsSource::to_wire);
                wire.mode = mode;
                wire.exclude_binding = exclude_binding;
                wire.searchable = searchable.then_some(true);
            }
            ComponentKind::DateTimeInput {
                label,
                binding,
                mode,
                min_date,
                max_date,
            } => {
                wire.label = label;
                wire.binding = binding;
                wire.mode = mode;
                wire.min_date = min_date.as_ref().map(DateBound::to_wire);
                wire.max_date = max_date.as_ref().map(DateBound::to_wire);
            }
            ComponentKind::Stepper {
                label,
                binding,
                min,
                max,
            } => {
                wire.label = label;
                wire.binding = binding;
                wire.min = min.map(Value::from);
                wire.max = max.map(Value::from);
            }
            ComponentKind::CheckBox { label, binding } => {
                wire.label = label;
                wire.binding = binding;
            }
            ComponentKind::TextField {
                label,
                binding,
                hint,
            } => {
                wire.label = label;
                wire.binding = binding;
                wire.hint = hint;
            }
            ComponentKind::CheckboxGroup {
                label,
                binding,
                options,
            } => {
                wire.label = label;
                wire.binding = binding;
                wire.options = options.as_ref().map(OptionsSource::to_wire);
            }
            ComponentKind::List {
                binding,
                item_template,
            } => {
                wire.binding = binding;
                wire.item_template = item_template;
            }
            ComponentKind::Unknown { props, .. } => wire.extra = props,
        }

        wire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn decode(value: Value) -> Component {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_text() {
        let component = decode(json!({"id": "t1", "component": "Text", "text": "Hello"}));
        assert_eq!(component.id, "t1");
        assert_eq!(
            component.kind,
            ComponentKind::Text {
                text: Some("Hello".into()),
                binding: None,
                style: None
            }
        );
        assert!(component.children.is_empty());
    }

    #[test]
    fn test_component_type_alias() {
        let component = decode(json!({"id": "root", "componentType": "Column", "children": ["a"]}));
        assert_eq!(component.kind, ComponentKind::Column);
        assert_eq!(component.children, vec!["a".to_string()]);
        assert!(component.is_root());
    }

    #[test]
    fn test_unknown_type_keeps_props() {
        let component = decode(json!({
            "id": "x",
            "component": "Carousel",
            "label": "Pick",
            "speed": 3
        }));
        match &component.kind {
            ComponentKind::Unknown { type_name, props } => {
                assert_eq!(type_name, "Carousel");
                assert_eq!(props.get("label"), Some(&json!("Pick")));
                assert_eq!(props.get("speed"), Some(&json!(3)));
                assert!(props.get("id").is_none());
            }
            other => panic!("expected unknown, got {other:?}"),
        }
        assert!(component.kind.is_unknown());
        assert_eq!(component.type_name(), "Carousel");
    }

    #[test]
    fn test_missing_type_is_unknown() {
        let component = decode(json!({"id": "x"}));
        assert_eq!(component.type_name(), "");
        assert!(component.kind.is_unknown());
    }

    #[test]
    fn test_options_inline_and_bound() {
        let inline = decode(json!({
            "id": "trip",
            "component": "ChoicePicker",
            "binding": "/flight/tripType",
            "options": [
                {"value": "oneway", "label": "One way"},
                {"value": 3},
                {"value": "roundtrip", "label": "Round trip"}
            ]
        }));
        assert_eq!(
            inline.kind.options(),
            Some(&OptionsSource::Inline(vec![
                ChoiceOption::new("oneway", "One way"),
                ChoiceOption::new("roundtrip", "Round trip"),
            ]))
        );
        assert_eq!(inline.kind.binding(), Some("/flight/tripType"));

        let bound = decode(json!({
            "id": "airports",
            "component": "CheckboxGroup",
            "options": "/lists/airports"
        }));
        assert_eq!(
            bound.kind.options(),
            Some(&OptionsSource::Bound("/lists/airports".into()))
        );
    }

    #[test]
    fn test_malformed_fields_degrade() {
        let component = decode(json!({
            "id": "s",
            "component": "Stepper",
            "children": "not-a-list",
            "min": "zero",
            "max": 9,
            "options": 42
        }));
        assert!(component.children.is_empty());
        assert_eq!(
            component.kind,
            ComponentKind::Stepper {
                label: None,
                binding: None,
                min: None,
                max: Some(9.0)
            }
        );
    }

    #[test]
    fn test_wrong_typed_text_fields_degrade() {
        let component = decode(json!({
            "id": "go",
            "component": "Button",
            "label": 5,
            "icon": {"name": "plane"},
            "action": ["search"],
            "visible": null
        }));
        assert_eq!(
            component.kind,
            ComponentKind::Button {
                label: Some("5".into()),
                icon: None,
                action: None,
                variant: None
            }
        );

        let picker = decode(json!({"id": "p", "component": "ChoicePicker", "searchable": "yes"}));
        assert!(matches!(
            picker.kind,
            ComponentKind::ChoicePicker { searchable: false, .. }
        ));
        assert!(serde_json::from_value::<Component>(json!({"component": "Text"})).is_err());
    }

    #[test]
    fn test_date_bounds() {
        let component = decode(json!({
            "id": "ret",
            "component": "DateTimeInput",
            "minDate": "/flight/departureDate",
            "maxDate": "today"
        }));
        match component.kind {
            ComponentKind::DateTimeInput {
                min_date, max_date, ..
            } => {
                assert_eq!(min_date, Some(DateBound::Path("/flight/departureDate".into())));
                assert_eq!(max_date, Some(DateBound::Today));
            }
            other => panic!("expected date input, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_uses_flat_wire_shape() {
        let button = Component::new(
            "search",
            ComponentKind::Button {
                label: Some("Search".into()),
                icon: None,
                action: Some("search-flights".into()),
                variant: Some("primary".into()),
            },
        )
        .with_visible("/ready == true");

        let value = serde_json::to_value(&button).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "search",
                "component": "Button",
                "visible": "/ready == true",
                "label": "Search",
                "action": "search-flights",
                "variant": "primary"
            })
        );
        assert_eq!(decode(value), button);
    }

    #[test]
    fn test_capabilities() {
        let card = Component::new("c", ComponentKind::Card { action: Some("open".into()) });
        assert!(card.kind.is_container());
        assert!(!card.kind.is_input());
        assert_eq!(card.kind.action(), Some("open"));

        let field = Component::new(
            "f",
            ComponentKind::TextField {
                label: Some("Name".into()),
                binding: Some("/name".into()),
                hint: None,
            },
        );
        assert!(field.kind.is_input());
        assert_eq!(field.kind.label(), Some("Name"));
        assert_eq!(field.kind.action(), None);
    }
}
