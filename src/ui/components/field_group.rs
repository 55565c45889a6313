// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Field group editor: one visual row per list entry, with add/remove/reorder
//! controls routed as messages to the underlying [`FieldGroupList`].

use std::path::PathBuf;

use eframe::egui;
use serde_json::Value;

use crate::models::error::FieldGroupError;
use crate::models::list::{FieldGroupList, LoadOutcome, RowCommand, TracingListener};
use crate::models::record::JsonRecord;
use crate::models::row::{FieldGroupRow, RowId};
use crate::models::sub_field::SubField;
use crate::models::template::{GroupTemplate, SubFieldKind};
use crate::models::value::ListValue;
use crate::ui::components::toggle_switch;

/// UI state for the edited record and its field group.
#[derive(Debug)]
pub struct FieldGroupModel {
    list: FieldGroupList,
    record: JsonRecord,
    source: Option<PathBuf>,
    repository_path: String,
    dirty: bool,
}

impl FieldGroupModel {
    pub fn new(template: GroupTemplate, repository_path: &str) -> Result<Self, FieldGroupError> {
        Ok(Self {
            list: build_list(template, repository_path)?,
            record: JsonRecord::default(),
            source: None,
            repository_path: repository_path.to_string(),
            dirty: false,
        })
    }

    pub fn list(&self) -> &FieldGroupList {
        &self.list
    }

    /// Record as last loaded from disk.
    pub fn record(&self) -> &JsonRecord {
        &self.record
    }

    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self, record: JsonRecord, path: PathBuf) {
        self.record = record;
        self.source = Some(path);
        self.dirty = false;
    }

    pub fn has_invalid_fields(&self) -> bool {
        self.list.has_invalid_fields()
    }
}

fn build_list(
    template: GroupTemplate,
    repository_path: &str,
) -> Result<FieldGroupList, FieldGroupError> {
    let mut list = FieldGroupList::new(template)?;
    list.add_listener(Box::new(TracingListener));
    list.process_path(repository_path);
    Ok(list)
}

/// Messages produced by the field group view.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldGroupMsg {
    OpenRecordRequested,
    OpenTemplateRequested,
    RecordLoaded { record: JsonRecord, source: PathBuf },
    TemplateLoaded { template: GroupTemplate, source: PathBuf },
    LoadCancelled,
    LoadFailed(String),
    Row(RowCommand),
    EditValue { row: RowId, field: String, value: Value },
    /// Replace all rows with a loosely typed value (`null` clears).
    ReplaceValue(Value),
    SetEnabled(bool),
}

/// Commands that require side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldGroupCommand {
    PickRecordFile,
    PickTemplateFile,
}

/// Feedback surfaced to the status bar/modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldGroupEvent {
    pub message: String,
    pub is_error: bool,
}

impl FieldGroupEvent {
    fn info(message: impl Into<String>) -> Option<Self> {
        Some(Self {
            message: message.into(),
            is_error: false,
        })
    }

    fn error(message: impl Into<String>) -> Option<Self> {
        Some(Self {
            message: message.into(),
            is_error: true,
        })
    }
}

/// Update the model based on a message.
pub fn update(
    model: &mut FieldGroupModel,
    msg: FieldGroupMsg,
    cmds: &mut Vec<FieldGroupCommand>,
) -> Option<FieldGroupEvent> {
    match msg {
        FieldGroupMsg::OpenRecordRequested => {
            cmds.push(FieldGroupCommand::PickRecordFile);
            None
        }
        FieldGroupMsg::OpenTemplateRequested => {
            cmds.push(FieldGroupCommand::PickTemplateFile);
            None
        }
        FieldGroupMsg::LoadCancelled => FieldGroupEvent::info("Open cancelled."),
        FieldGroupMsg::LoadFailed(err) => FieldGroupEvent::error(err),
        FieldGroupMsg::RecordLoaded { record, source } => {
            match model.list.process_record(&record, &model.repository_path) {
                LoadOutcome::Loaded { rows } => {
                    model.record = record;
                    model.dirty = false;
                    let message = format!("Loaded {rows} row(s) from {}", source.display());
                    model.source = Some(source);
                    FieldGroupEvent::info(message)
                }
                LoadOutcome::Vetoed => FieldGroupEvent::info("Record load was cancelled."),
            }
        }
        FieldGroupMsg::TemplateLoaded { template, source } => {
            let enabled = model.list.is_enabled();
            match build_list(template, &model.repository_path) {
                Ok(mut list) => {
                    list.set_enabled(enabled);
                    list.process_record(&model.record, &model.repository_path);
                    model.list = list;
                    FieldGroupEvent::info(format!(
                        "Template '{}' loaded from {}",
                        model.list.name(),
                        source.display()
                    ))
                }
                Err(err) => FieldGroupEvent::error(format!("Invalid template: {err}")),
            }
        }
        FieldGroupMsg::Row(command) => {
            if model.list.dispatch(command) {
                model.dirty = true;
                None
            } else if command == RowCommand::Add && model.list.has_add_control() {
                FieldGroupEvent::info(format!(
                    "Row limit of {} reached.",
                    model.list.capacity()
                ))
            } else {
                None
            }
        }
        FieldGroupMsg::EditValue { row, field, value } => {
            if model.list.edit_field(row, &field, value) {
                model.dirty = true;
            }
            None
        }
        FieldGroupMsg::ReplaceValue(value) => {
            if model.list.is_read_only() {
                return None;
            }
            model.list.set_value(ListValue::from_json(&value));
            model.dirty = true;
            FieldGroupEvent::info(format!("Field group now holds {} row(s).", model.list.len()))
        }
        FieldGroupMsg::SetEnabled(enabled) => {
            model.list.set_enabled(enabled);
            FieldGroupEvent::info(if enabled {
                "Field group enabled."
            } else {
                "Field group disabled; its values will not be saved."
            })
        }
    }
}

/// Render the component and return triggered messages.
pub fn view(ui: &mut egui::Ui, model: &FieldGroupModel) -> Vec<FieldGroupMsg> {
    let mut msgs = Vec::new();
    let list = &model.list;

    ui.horizontal(|ui| {
        if ui
            .button(format!("{} Open record", egui_phosphor::regular::FOLDER_OPEN))
            .clicked()
        {
            msgs.push(FieldGroupMsg::OpenRecordRequested);
        }
        if ui
            .button(format!("{} Open template", egui_phosphor::regular::LIST_DASHES))
            .clicked()
        {
            msgs.push(FieldGroupMsg::OpenTemplateRequested);
        }
        ui.separator();

        let mut enabled = list.is_enabled();
        if toggle_switch(ui, &mut enabled).clicked() {
            msgs.push(FieldGroupMsg::SetEnabled(enabled));
        }
        ui.label("Enabled");
    });

    ui.add_space(6.0);
    ui.label(
        egui::RichText::new(format!(
            "{} · {} of {} row(s){}",
            list.name(),
            list.len(),
            list.capacity(),
            if list.is_read_only() { " · read-only" } else { "" }
        ))
        .small()
        .color(egui::Color32::from_gray(110)),
    )
    .on_hover_text(format!("Repository path: {}", list.path()));
    ui.add_space(8.0);

    if list.is_empty() {
        ui.label(
            egui::RichText::new("No rows yet.")
                .italics()
                .color(egui::Color32::from_gray(110)),
        );
    }

    let last = list.len().saturating_sub(1);
    for (idx, row) in list.rows().iter().enumerate() {
        render_row(ui, list, row, idx == 0, idx == last, &mut msgs);
        ui.add_space(4.0);
    }

    if list.has_add_control() {
        ui.add_space(4.0);
        let add = ui
            .add_enabled(
                list.is_enabled() && list.can_add(),
                egui::Button::new(format!("{} Add row", egui_phosphor::regular::PLUS)),
            )
            .on_disabled_hover_text("Row limit reached or field group disabled");
        if add.clicked() {
            msgs.push(FieldGroupMsg::Row(RowCommand::Add));
        }
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let clear = ui.add_enabled(
                list.is_enabled() && !list.is_empty(),
                egui::Button::new(format!("{} Clear rows", egui_phosphor::regular::TRASH)),
            );
            if clear.clicked() {
                msgs.push(FieldGroupMsg::ReplaceValue(Value::Null));
            }
        });
    }

    ui.add_space(8.0);
    render_hidden_fields(ui, list);

    msgs
}

fn render_row(
    ui: &mut egui::Ui,
    list: &FieldGroupList,
    row: &FieldGroupRow,
    first: bool,
    last: bool,
    msgs: &mut Vec<FieldGroupMsg>,
) {
    let id = row.id();
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                egui::Grid::new(format!("field-group-row-{id}"))
                    .num_columns(2)
                    .spacing(egui::vec2(8.0, 4.0))
                    .show(ui, |ui| {
                        for field in row.fields() {
                            ui.label(field.label()).on_hover_text(field.kind().as_str());
                            render_field(ui, id, field, msgs);
                            ui.end_row();
                        }
                    });
                for (name, err) in row.validation_errors() {
                    ui.label(
                        egui::RichText::new(format!("{name}: {err}"))
                            .small()
                            .color(egui::Color32::from_rgb(200, 60, 60)),
                    );
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                let enabled = list.is_enabled();
                if row.shows_remove_control()
                    && ui
                        .add_enabled(enabled, egui::Button::new(egui_phosphor::regular::MINUS))
                        .on_hover_text("Remove row")
                        .clicked()
                {
                    msgs.push(FieldGroupMsg::Row(RowCommand::Remove(id)));
                }
                if row.shows_reorder_controls() {
                    if ui
                        .add_enabled(
                            enabled && !last,
                            egui::Button::new(egui_phosphor::regular::ARROW_DOWN),
                        )
                        .on_hover_text("Move down")
                        .clicked()
                    {
                        msgs.push(FieldGroupMsg::Row(RowCommand::MoveDown(id)));
                    }
                    if ui
                        .add_enabled(
                            enabled && !first,
                            egui::Button::new(egui_phosphor::regular::ARROW_UP),
                        )
                        .on_hover_text("Move up")
                        .clicked()
                    {
                        msgs.push(FieldGroupMsg::Row(RowCommand::MoveUp(id)));
                    }
                }
            });
        });
    });
}

fn render_field(ui: &mut egui::Ui, row: RowId, field: &SubField, msgs: &mut Vec<FieldGroupMsg>) {
    let editable = field.is_enabled() && !field.is_read_only();
    let edit = |value: Value| FieldGroupMsg::EditValue {
        row,
        field: field.name().to_string(),
        value,
    };

    match field.kind() {
        SubFieldKind::Checkbox => {
            let mut checked = field.value().as_bool().unwrap_or(false);
            if ui
                .add_enabled(editable, egui::Checkbox::without_text(&mut checked))
                .changed()
            {
                msgs.push(edit(Value::Bool(checked)));
            }
        }
        SubFieldKind::NumberField => {
            let mut text = field.display_text();
            let resp = ui.add_enabled(
                editable,
                egui::TextEdit::singleline(&mut text).hint_text("Number"),
            );
            if resp.changed() {
                msgs.push(edit(parse_number(&text)));
            }
        }
        kind => {
            let mut text = field.display_text();
            let hint = match kind {
                SubFieldKind::PathField => field.path().or(field.root_path()).unwrap_or("/content"),
                _ => "",
            };
            let mut resp = ui.add_enabled(
                editable,
                egui::TextEdit::singleline(&mut text)
                    .hint_text(hint)
                    .desired_width(f32::INFINITY),
            );
            if let Some(root) = field.root_path().filter(|_| kind.is_path_aware()) {
                let title = field.root_title().unwrap_or(root);
                resp = resp.on_hover_text(format!("Browse root: {title}"));
            }
            if resp.changed() {
                msgs.push(edit(text_value(text)));
            }
        }
    }
}

/// Hidden values posted alongside the rows.
fn render_hidden_fields(ui: &mut egui::Ui, list: &FieldGroupList) {
    egui::CollapsingHeader::new("Hidden fields")
        .default_open(false)
        .show(ui, |ui| {
            let hidden = list
                .delete_markers()
                .values()
                .chain(list.type_hint())
                .map(|h| {
                    let state = if h.is_enabled() { "" } else { " (disabled)" };
                    if h.value().is_empty() {
                        format!("{}{state}", h.name())
                    } else {
                        format!("{} = {}{state}", h.name(), h.value())
                    }
                });
            for line in hidden {
                ui.label(egui::RichText::new(line).monospace().small());
            }
            ui.label(
                egui::RichText::new(format!(
                    "{} sub-field(s) registered with the form",
                    list.registry().fields().len()
                ))
                .small()
                .color(egui::Color32::from_gray(110)),
            );
            for (idx, row) in list.rows().iter().enumerate() {
                let names: Vec<&str> = list
                    .registry()
                    .fields()
                    .iter()
                    .filter(|f| f.row == row.id())
                    .map(|f| f.name.as_str())
                    .collect();
                ui.label(
                    egui::RichText::new(format!("row {}: {}", idx + 1, names.join(", ")))
                        .monospace()
                        .small(),
                );
            }
        });
}

/// Empty text clears the value.
fn text_value(text: String) -> Value {
    if text.is_empty() {
        Value::Null
    } else {
        Value::String(text)
    }
}

/// Keep numeric input numeric when it parses; otherwise keep the raw text for validation.
fn parse_number(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model() -> FieldGroupModel {
        FieldGroupModel::new(GroupTemplate::default(), "/content/page").unwrap()
    }

    fn loaded_model() -> FieldGroupModel {
        let mut model = model();
        let record =
            JsonRecord::from_value(json!({"path": ["/a", "/b"], "thumbnail": ["t1", "t2"]}))
                .unwrap();
        let event = update(
            &mut model,
            FieldGroupMsg::RecordLoaded {
                record,
                source: PathBuf::from("page.json"),
            },
            &mut Vec::new(),
        )
        .unwrap();
        assert!(event.message.contains("Loaded 2 row(s)"));
        model
    }

    #[test]
    fn open_requests_enqueue_commands() {
        let mut model = model();
        let mut cmds = Vec::new();

        assert!(update(&mut model, FieldGroupMsg::OpenRecordRequested, &mut cmds).is_none());
        assert!(update(&mut model, FieldGroupMsg::OpenTemplateRequested, &mut cmds).is_none());
        assert_eq!(
            cmds,
            vec![FieldGroupCommand::PickRecordFile, FieldGroupCommand::PickTemplateFile]
        );
    }

    #[test]
    fn record_loaded_populates_rows() {
        let model = loaded_model();
        assert_eq!(model.list().len(), 2);
        assert!(!model.is_dirty());
        assert_eq!(model.source(), Some(&PathBuf::from("page.json")));
    }

    #[test]
    fn row_commands_mark_dirty() {
        let mut model = loaded_model();
        let second = model.list().rows()[1].id();

        update(&mut model, FieldGroupMsg::Row(RowCommand::MoveUp(second)), &mut Vec::new());

        assert!(model.is_dirty());
        assert_eq!(model.list().value()[0]["path"], json!("/b"));
    }

    #[test]
    fn add_beyond_limit_reports_status() {
        let mut template = GroupTemplate::default();
        template.max_items = 1;
        let mut model = FieldGroupModel::new(template, "/content").unwrap();

        assert!(update(&mut model, FieldGroupMsg::Row(RowCommand::Add), &mut Vec::new()).is_none());
        let event =
            update(&mut model, FieldGroupMsg::Row(RowCommand::Add), &mut Vec::new()).unwrap();

        assert!(event.message.contains("Row limit of 1"));
        assert_eq!(model.list().len(), 1);
    }

    #[test]
    fn edit_value_updates_field() {
        let mut model = loaded_model();
        let row = model.list().rows()[0].id();

        update(
            &mut model,
            FieldGroupMsg::EditValue {
                row,
                field: "thumbnail".into(),
                value: json!("/new.png"),
            },
            &mut Vec::new(),
        );

        assert_eq!(model.list().value()[0]["thumbnail"], json!("/new.png"));
        assert!(model.is_dirty());
    }

    #[test]
    fn template_reload_keeps_record_rows() {
        let mut model = loaded_model();
        let template = crate::models::template::parse_group_template(
            r#"{"name":"./stories","maxItems":5,"fieldConfig":{"items":[{"name":"path"}]}}"#,
        )
        .unwrap();

        let event = update(
            &mut model,
            FieldGroupMsg::TemplateLoaded {
                template,
                source: PathBuf::from("t.json"),
            },
            &mut Vec::new(),
        )
        .unwrap();

        assert!(!event.is_error);
        assert_eq!(model.list().capacity(), 5);
        assert_eq!(model.list().field_names(), &["path".to_string()]);
        assert_eq!(model.list().len(), 2);
    }

    #[test]
    fn disable_propagates() {
        let mut model = loaded_model();
        update(&mut model, FieldGroupMsg::SetEnabled(false), &mut Vec::new());

        assert!(!model.list().is_enabled());
        assert!(
            model
                .list()
                .rows()
                .iter()
                .flat_map(|r| r.fields())
                .all(|f| !f.is_enabled())
        );
    }

    #[test]
    fn replace_value_null_clears_rows() {
        let mut model = loaded_model();
        let msg = FieldGroupMsg::ReplaceValue(Value::Null);
        let event = update(&mut model, msg, &mut Vec::new()).unwrap();

        assert!(model.list().is_empty());
        assert!(model.list().registry().fields().is_empty());
        assert!(model.is_dirty());
        assert!(event.message.contains("0 row(s)"));
    }

    #[test]
    fn number_input_is_typed() {
        assert_eq!(parse_number("42"), json!(42));
        assert_eq!(parse_number(" 1.5 "), json!(1.5));
        assert_eq!(parse_number("abc"), json!("abc"));
        assert_eq!(parse_number(""), Value::Null);
    }
}
