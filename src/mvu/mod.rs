// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use std::path::PathBuf;

use crate::logic::record_io::{read_record, read_template, write_record};
use crate::logic::submit::write_back;
use crate::models::error::FieldGroupError;
use crate::models::record::JsonRecord;
use crate::models::template::GroupTemplate;
use crate::ui::components::field_group::{
    self, FieldGroupCommand, FieldGroupModel, FieldGroupMsg,
};

/// Top-level application state.
#[derive(Debug)]
pub struct AppModel {
    /// Field group editor state, including the edited record.
    pub field_group: FieldGroupModel,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    pub fn new(template: GroupTemplate, repository_path: &str) -> Result<Self, FieldGroupError> {
        Ok(Self {
            field_group: FieldGroupModel::new(template, repository_path)?,
            status: None,
            error: None,
            pending_commands: 0,
        })
    }
}

/// Application messages routed through the update function.
pub enum Msg {
    SaveRequested(PathBuf),
    SaveCancelled,
    SaveCompleted(Result<SavedRecord, String>),
    DismissError,
    FieldGroup(FieldGroupMsg),
}

/// Commands represent side-effects executed between frames.
pub enum Command {
    PickRecordFile,
    PickTemplateFile,
    LoadRecord(PathBuf),
    LoadTemplate(PathBuf),
    SaveRecord(SavePayload),
}

/// Record composed from the field group, ready to be written.
pub struct SavePayload {
    /// Final record path on disk (with `.json` extension enforced).
    pub output: PathBuf,
    pub record: JsonRecord,
}

/// Record as written to disk.
pub struct SavedRecord {
    pub path: PathBuf,
    pub record: JsonRecord,
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::DismissError => model.error = None,
        Msg::FieldGroup(m) => {
            let mut group_cmds = Vec::new();
            if let Some(event) = field_group::update(&mut model.field_group, m, &mut group_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            for c in group_cmds {
                match c {
                    FieldGroupCommand::PickRecordFile => cmds.push(Command::PickRecordFile),
                    FieldGroupCommand::PickTemplateFile => cmds.push(Command::PickTemplateFile),
                }
            }
        }
        Msg::SaveRequested(output_path) => match validate_for_save(model, output_path) {
            Ok(payload) => cmds.push(Command::SaveRecord(payload)),
            Err(err) => surface_event(model, err, true),
        },
        Msg::SaveCancelled => surface_event(model, "Save cancelled.".to_string(), false),
        Msg::SaveCompleted(result) => match result {
            Ok(saved) => {
                let message = format!("Record saved: {}", saved.path.display());
                model.field_group.mark_saved(saved.record, saved.path);
                surface_event(model, message, false);
            }
            Err(err) => surface_event(model, format!("Failed to save record:\n\n{err}"), true),
        },
    }
}

/// Execute a command synchronously and return a resulting message.
pub fn run_command(cmd: Command) -> Msg {
    match cmd {
        Command::PickRecordFile => {
            let file = rfd::FileDialog::new()
                .set_title("Open record")
                .add_filter("JSON", &["json"])
                .pick_file();
            match file {
                Some(path) => run_command(Command::LoadRecord(path)),
                None => Msg::FieldGroup(FieldGroupMsg::LoadCancelled),
            }
        }
        Command::PickTemplateFile => {
            let file = rfd::FileDialog::new()
                .set_title("Open field group template")
                .add_filter("JSON", &["json"])
                .pick_file();
            match file {
                Some(path) => run_command(Command::LoadTemplate(path)),
                None => Msg::FieldGroup(FieldGroupMsg::LoadCancelled),
            }
        }
        Command::LoadRecord(path) => match read_record(&path) {
            Ok(record) => Msg::FieldGroup(FieldGroupMsg::RecordLoaded {
                record,
                source: path,
            }),
            Err(err) => Msg::FieldGroup(FieldGroupMsg::LoadFailed(format!("{err:#}"))),
        },
        Command::LoadTemplate(path) => match read_template(&path) {
            Ok(template) => Msg::FieldGroup(FieldGroupMsg::TemplateLoaded {
                template,
                source: path,
            }),
            Err(err) => Msg::FieldGroup(FieldGroupMsg::LoadFailed(format!("{err:#}"))),
        },
        Command::SaveRecord(payload) => {
            let res = write_record(&payload.output, &payload.record).map(|_| SavedRecord {
                path: payload.output,
                record: payload.record,
            });
            Msg::SaveCompleted(res.map_err(|e| format!("{e:#}")))
        }
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        tracing::warn!(%message, "surfacing error");
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

/// Validate model state and compose the record to write.
fn validate_for_save(model: &AppModel, output_path: PathBuf) -> Result<SavePayload, String> {
    let list = model.field_group.list();
    if let Some((row, name, msg)) = list.validation_errors().into_iter().next() {
        return Err(format!("Row {} field '{}': {}", row + 1, name, msg));
    }

    let mut record = model.field_group.record().clone();
    write_back(list, &mut record);

    Ok(SavePayload {
        output: output_path,
        record,
    })
}
