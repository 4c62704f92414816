//! Plain-text presenter
//!
//! Renders a surface as an indented outline, one component per line, using
//! the same derived values a graphical renderer would show.

use std::fmt::{self, Write};

use a2ui_core::view::{
    choice_style, display_value, icon_glyph, list_item_action, list_items, resolve_date_bound,
    resolve_options, selected_values, stepper_value, text_content, today, ChoiceStyle,
};
use a2ui_core::{ComponentKind, DataModel, Presenter, ResolvedNode, SurfaceView};
use chrono::NaiveDate;

/// Writes surfaces into a string buffer
#[derive(Debug)]
pub struct TextPresenter {
    out: String,
    today: NaiveDate,
}

impl TextPresenter {
    /// Presenter resolving `"today"` to the local date
    pub fn new() -> Self {
        Self::with_today(today())
    }

    /// Presenter with a fixed notion of today
    pub fn with_today(today: NaiveDate) -> Self {
        Self {
            out: String::new(),
            today,
        }
    }

    /// Everything rendered so far
    pub fn finish(self) -> String {
        self.out
    }

    fn write_view(&mut self, view: &SurfaceView<'_>) -> fmt::Result {
        writeln!(self.out, "surface {}", view.surface_id)?;
        match &view.tree {
            Some(tree) => self.write_node(tree, view.data_model, 1),
            None => writeln!(self.out, "  (empty)"),
        }
    }

    fn write_node(&mut self, node: &ResolvedNode<'_>, model: &DataModel, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let component = node.component;
        write!(self.out, "{indent}{} #{}", component.type_name(), component.id)?;
        self.write_detail(&component.kind, model)?;
        writeln!(self.out)?;

        if let ComponentKind::List { .. } = &component.kind {
            for item in list_items(&component.kind, model) {
                let action = list_item_action(item).unwrap_or_else(|| "-".to_string());
                writeln!(self.out, "{indent}  - {action}")?;
            }
        }

        for child in &node.children {
            self.write_node(child, model, depth + 1)?;
        }
        Ok(())
    }

    fn write_detail(&mut self, kind: &ComponentKind, model: &DataModel) -> fmt::Result {
        let bound = kind.binding().and_then(|binding| model.get(binding));
        match kind {
            ComponentKind::Column | ComponentKind::Row => Ok(()),
            ComponentKind::Text { .. } => write!(self.out, " {:?}", text_content(kind, model)),
            ComponentKind::Icon { icon } => write!(self.out, " {}", icon_glyph(icon.as_deref())),
            ComponentKind::Card { action } | ComponentKind::Button { action, .. } => {
                if let ComponentKind::Button { label, icon, .. } = kind {
                    match (icon, label) {
                        (Some(icon), _) => write!(self.out, " {}", icon_glyph(Some(icon)))?,
                        (None, Some(label)) => write!(self.out, " {label:?}")?,
                        (None, None) => {}
                    }
                }
                match action {
                    Some(action) => write!(self.out, " -> {action}"),
                    None => Ok(()),
                }
            }
            ComponentKind::ChoicePicker { .. } => {
                let options = resolve_options(kind, model);
                let selected = display_value(bound);
                let style = match choice_style(kind, options.len()) {
                    ChoiceStyle::Radio => "radio",
                    ChoiceStyle::Dropdown => "dropdown",
                };
                let values: Vec<String> = options
                    .iter()
                    .map(|option| {
                        if option.value == selected {
                            format!("{}*", option.value)
                        } else {
                            option.value.clone()
                        }
                    })
                    .collect();
                self.write_label(kind)?;
                write!(self.out, " [{}] ({style})", values.join(", "))
            }
            ComponentKind::CheckboxGroup { .. } => {
                let selected = selected_values(kind, model);
                let values: Vec<String> = resolve_options(kind, model)
                    .into_iter()
                    .map(|option| {
                        let mark = if selected.contains(&option.value) { "x" } else { " " };
                        format!("[{mark}] {}", option.value)
                    })
                    .collect();
                self.write_label(kind)?;
                write!(self.out, " {}", values.join(" "))
            }
            ComponentKind::DateTimeInput {
                min_date, max_date, ..
            } => {
                self.write_label(kind)?;
                write!(self.out, " = {}", display_value(bound))?;
                let min = min_date
                    .as_ref()
                    .and_then(|bound| resolve_date_bound(bound, model, self.today));
                let max = max_date
                    .as_ref()
                    .and_then(|bound| resolve_date_bound(bound, model, self.today));
                if min.is_some() || max.is_some() {
                    write!(
                        self.out,
                        " ({}..{})",
                        min.unwrap_or_default(),
                        max.unwrap_or_default()
                    )?;
                }
                Ok(())
            }
            ComponentKind::Stepper { .. } => {
                self.write_label(kind)?;
                write!(self.out, " = {}", stepper_value(kind, model))
            }
            ComponentKind::CheckBox { .. } => {
                let mark = if bound.and_then(serde_json::Value::as_bool).unwrap_or(false) {
                    "x"
                } else {
                    " "
                };
                write!(self.out, " [{mark}]")?;
                self.write_label(kind)
            }
            ComponentKind::TextField { hint, .. } => {
                self.write_label(kind)?;
                match bound {
                    Some(_) => write!(self.out, " = {:?}", display_value(bound)),
                    None => write!(self.out, " ({})", hint.as_deref().unwrap_or_default()),
                }
            }
            ComponentKind::List { .. } => {
                write!(self.out, " ({} items)", list_items(kind, model).len())
            }
            ComponentKind::Unknown { .. } => write!(self.out, " (unsupported)"),
        }
    }

    fn write_label(&mut self, kind: &ComponentKind) -> fmt::Result {
        match kind.label() {
            Some(label) => write!(self.out, " {label:?}"),
            None => Ok(()),
        }
    }
}

impl Presenter for TextPresenter {
    fn present(&mut self, view: &SurfaceView<'_>) {
        if let Err(e) = self.write_view(view) {
            tracing::warn!(surface_id = %view.surface_id, error = %e, "Failed to render surface");
        }
    }
}
