// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Field group list: an ordered set of rows kept in sync with a
//! column-oriented record.
//!
//! Responsibilities:
//! - Transpose record columns into rows on load and expose rows in order on save.
//! - Apply structural commands (add, remove, move up/down) by row identity.
//! - Own the hidden delete markers and type hint, cascading enable state to them.
//! - Keep the owning form's field registry in step with row creation/removal.

use std::fmt;

use indexmap::IndexMap;

use crate::models::error::FieldGroupError;
use crate::models::hidden::HiddenField;
use crate::models::record::Record;
use crate::models::row::{FieldGroupRow, RowId};
use crate::models::template::{GroupTemplate, SubFieldDecl};
use crate::models::value::{ListValue, RawValue, RowValue, transpose};

/// Observer of list events.
pub trait ListListener {
    /// Fired before `set_value` mutates anything.
    fn change(&mut self, _new: &ListValue, _old: &[RowValue]) {}

    /// Fired before a record is loaded. Returning `false` aborts the load.
    fn before_load_content(&mut self, _record: &dyn Record, _path: &str) -> bool {
        true
    }

    /// Fired after a record was loaded.
    fn load_content(&mut self, _record: &dyn Record, _path: &str) {}
}

/// Listener that reports every event through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingListener;

impl ListListener for TracingListener {
    fn change(&mut self, new: &ListValue, old: &[RowValue]) {
        tracing::debug!(new_rows = new.rows().len(), old_rows = old.len(), "field group change");
    }

    fn before_load_content(&mut self, _record: &dyn Record, path: &str) -> bool {
        tracing::debug!(%path, "loading field group content");
        true
    }

    fn load_content(&mut self, _record: &dyn Record, path: &str) {
        tracing::info!(%path, "field group content loaded");
    }
}

/// Structural row command, dispatched through the owning list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowCommand {
    Add,
    MoveUp(RowId),
    MoveDown(RowId),
    Remove(RowId),
}

/// Result of [`FieldGroupList::process_record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { rows: usize },
    Vetoed,
}

/// A sub-field registered with the owning form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredField {
    pub row: RowId,
    pub name: String,
}

/// Field registry of the owning form, as seen by this list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldRegistry {
    fields: Vec<RegisteredField>,
}

impl FieldRegistry {
    fn register(&mut self, row: &FieldGroupRow) {
        self.fields
            .extend(row.fields().iter().map(|f| RegisteredField {
                row: row.id(),
                name: f.name().to_string(),
            }));
    }

    fn unregister(&mut self, row: RowId) {
        self.fields.retain(|f| f.row != row);
    }

    pub fn fields(&self) -> &[RegisteredField] {
        &self.fields
    }
}

/// Editable list of field-group rows.
pub struct FieldGroupList {
    template: GroupTemplate,
    field_names: Vec<String>,
    rows: Vec<FieldGroupRow>,
    capacity: usize,
    path: String,
    enabled: bool,
    delete_markers: IndexMap<String, HiddenField>,
    type_hint: Option<HiddenField>,
    registry: FieldRegistry,
    listeners: Vec<Box<dyn ListListener>>,
}

impl fmt::Debug for FieldGroupList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldGroupList")
            .field("name", &self.template.name)
            .field("field_names", &self.field_names)
            .field("rows", &self.rows.len())
            .field("capacity", &self.capacity)
            .field("enabled", &self.enabled)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl FieldGroupList {
    /// Build an empty list for `template`.
    ///
    /// Delete markers are created for every declared name even when the
    /// group is read-only, so the storage layer always sees a complete set.
    pub fn new(template: GroupTemplate) -> Result<Self, FieldGroupError> {
        template.validate()?;

        let mut list = Self {
            capacity: template.max_items,
            field_names: Vec::new(),
            rows: Vec::new(),
            path: String::new(),
            enabled: true,
            delete_markers: IndexMap::new(),
            type_hint: None,
            registry: FieldRegistry::default(),
            listeners: Vec::new(),
            template,
        };
        let declarations = list.template.items.clone();
        list.set_field_names(&declarations);

        list.delete_markers = list
            .field_names
            .iter()
            .map(|name| (name.clone(), HiddenField::delete_marker(name)))
            .collect();
        list.type_hint = list
            .template
            .type_hint
            .as_deref()
            .map(|hint| HiddenField::type_hint(&list.template.name, hint));

        Ok(list)
    }

    fn set_field_names(&mut self, declarations: &[SubFieldDecl]) {
        self.field_names = declarations.iter().map(|d| d.name.clone()).collect();
    }

    /// Declared sub-field names in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn add_listener(&mut self, listener: Box<dyn ListListener>) {
        self.listeners.push(listener);
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn rows(&self) -> &[FieldGroupRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_read_only(&self) -> bool {
        self.template.read_only
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn delete_markers(&self) -> &IndexMap<String, HiddenField> {
        &self.delete_markers
    }

    pub fn type_hint(&self) -> Option<&HiddenField> {
        self.type_hint.as_ref()
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Whether the add control is installed.
    pub fn has_add_control(&self) -> bool {
        !self.template.read_only
    }

    /// Whether another row would be accepted by [`Self::add_item`].
    pub fn can_add(&self) -> bool {
        self.item_count() <= self.capacity
    }

    // Rows plus the trailing toolbar slot holding the add control and hidden fields.
    fn item_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Append a row, optionally merging `value` into it.
    ///
    /// Silently refused once the list holds `capacity` rows.
    pub fn add_item(&mut self, value: Option<&RowValue>) -> Option<RowId> {
        if !self.can_add() {
            tracing::debug!(
                group = %self.template.name,
                capacity = self.capacity,
                "row limit reached, add refused"
            );
            return None;
        }

        let mut row = FieldGroupRow::new(&self.template);
        if !self.enabled {
            row.set_enabled(false);
        }
        self.registry.register(&row);
        row.process_path(&self.path);
        if let Some(value) = value {
            row.set_value(value);
        }
        let id = row.id();
        self.rows.push(row);
        tracing::debug!(
            group = %self.template.name,
            row = %id,
            rows = self.rows.len(),
            "row added"
        );
        Some(id)
    }

    /// Store the repository path handed to path-aware sub-fields of new rows.
    pub fn process_path(&mut self, path: &str) {
        self.path = path.to_string();
    }

    /// Load rows from a column-oriented record.
    ///
    /// Only the first declared field decides whether the record holds
    /// sequences, a single scalar row, or nothing at all.
    pub fn process_record(&mut self, record: &dyn Record, path: &str) -> LoadOutcome {
        let proceed = self
            .listeners
            .iter_mut()
            .all(|l| l.before_load_content(record, path));
        if !proceed {
            tracing::info!(group = %self.template.name, %path, "load vetoed by listener");
            return LoadOutcome::Vetoed;
        }

        let raw: IndexMap<String, RawValue> = self
            .field_names
            .iter()
            .map(|name| (name.clone(), record.get(name)))
            .collect();
        self.set_value(transpose(&raw));
        let count = self.rows.len();

        for listener in &mut self.listeners {
            listener.load_content(record, path);
        }
        tracing::info!(group = %self.template.name, %path, rows = count, "record loaded");
        LoadOutcome::Loaded { rows: count }
    }

    /// Row values in visual order.
    pub fn value(&self) -> Vec<RowValue> {
        self.rows.iter().map(FieldGroupRow::value).collect()
    }

    /// Replace every row.
    ///
    /// Listeners see the new value together with the pre-mutation value.
    /// All old rows are torn down before the first new row is built.
    pub fn set_value(&mut self, value: impl Into<ListValue>) {
        let value = value.into();
        let old = self.value();
        for listener in &mut self.listeners {
            listener.change(&value, &old);
        }

        for row in self.rows.drain(..) {
            self.registry.unregister(row.id());
        }

        let added = value
            .rows()
            .iter()
            .filter_map(|row_value| self.add_item(Some(row_value)))
            .count();
        if added < value.rows().len() {
            tracing::warn!(
                group = %self.template.name,
                dropped = value.rows().len() - added,
                capacity = self.capacity,
                "rows beyond the limit were not loaded"
            );
        }
    }

    /// Apply a row command. Returns `false` when nothing changed.
    ///
    /// Read-only lists expose no controls, so every command is ignored.
    pub fn dispatch(&mut self, command: RowCommand) -> bool {
        if self.template.read_only {
            return false;
        }
        match command {
            RowCommand::Add => self.add_item(None).is_some(),
            RowCommand::MoveUp(id) => match self.position(id) {
                Some(idx) if idx > 0 => self.swap_values(idx, idx - 1),
                _ => false,
            },
            RowCommand::MoveDown(id) => match self.position(id) {
                Some(idx) if idx + 1 < self.rows.len() => self.swap_values(idx, idx + 1),
                _ => false,
            },
            RowCommand::Remove(id) => self.remove_row(id).is_some(),
        }
    }

    fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id() == id)
    }

    fn swap_values(&mut self, from: usize, to: usize) -> bool {
        if !self.template.orderable || from == to {
            return false;
        }
        let (lo, hi) = (from.min(to), from.max(to));
        let (head, tail) = self.rows.split_at_mut(hi);
        head[lo].reorder(&mut tail[0]);
        tracing::debug!(group = %self.template.name, from, to, "rows reordered");
        true
    }

    /// Detach a row from the list and from the form registry.
    pub fn remove_row(&mut self, id: RowId) -> Option<FieldGroupRow> {
        let idx = self.position(id)?;
        let row = self.rows.remove(idx);
        self.registry.unregister(id);
        tracing::debug!(
            group = %self.template.name,
            row = %id,
            rows = self.rows.len(),
            "row removed"
        );
        Some(row)
    }

    /// Edit one sub-field of one row. Disabled and read-only fields refuse.
    pub fn edit_field(&mut self, id: RowId, name: &str, value: serde_json::Value) -> bool {
        let Some(row) = self.rows.iter_mut().find(|r| r.id() == id) else {
            return false;
        };
        match row.fields_mut().iter_mut().find(|f| f.name() == name) {
            Some(field) if field.is_enabled() && !field.is_read_only() => {
                field.set_value(value);
                true
            }
            _ => false,
        }
    }

    /// Enable or disable the control together with every hidden field and sub-field.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        for marker in self.delete_markers.values_mut() {
            if enabled {
                marker.enable();
            } else {
                marker.disable();
            }
        }
        if let Some(hint) = self.type_hint.as_mut() {
            if enabled {
                hint.enable();
            } else {
                hint.disable();
            }
        }
        for row in &mut self.rows {
            row.set_enabled(enabled);
        }
    }

    /// Validation failures across rows, as `(row index, field name, message)`.
    pub fn validation_errors(&self) -> Vec<(usize, String, String)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(idx, row)| {
                row.validation_errors()
                    .into_iter()
                    .map(move |(name, msg)| (idx, name, msg))
            })
            .collect()
    }

    pub fn has_invalid_fields(&self) -> bool {
        !self.validation_errors().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::JsonRecord;
    use crate::models::template::{SubFieldKind, parse_group_template};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn row(pairs: &[(&str, Value)]) -> RowValue {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn find(list: &FieldGroupList, id: RowId) -> &FieldGroupRow {
        list.rows().iter().find(|r| r.id() == id).unwrap()
    }

    fn list() -> FieldGroupList {
        FieldGroupList::new(GroupTemplate::default()).unwrap()
    }

    fn record(value: Value) -> JsonRecord {
        JsonRecord::from_value(value).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
        veto: bool,
    }

    impl ListListener for Recorder {
        fn change(&mut self, new: &ListValue, old: &[RowValue]) {
            self.events
                .borrow_mut()
                .push(format!("change {}<-{}", new.rows().len(), old.len()));
        }

        fn before_load_content(&mut self, _record: &dyn Record, path: &str) -> bool {
            self.events.borrow_mut().push(format!("before {path}"));
            !self.veto
        }

        fn load_content(&mut self, _record: &dyn Record, path: &str) {
            self.events.borrow_mut().push(format!("load {path}"));
        }
    }

    #[test]
    fn loads_column_arrays_as_rows() {
        let mut list = list();
        let outcome = list.process_record(
            &record(json!({"path": ["/a", "/b"], "thumbnail": ["t1", "t2"]})),
            "/content/page",
        );

        assert_eq!(outcome, LoadOutcome::Loaded { rows: 2 });
        assert_eq!(
            list.value(),
            vec![
                row(&[("path", json!("/a")), ("thumbnail", json!("t1"))]),
                row(&[("path", json!("/b")), ("thumbnail", json!("t2"))]),
            ]
        );
    }

    #[test]
    fn loads_scalars_as_single_row() {
        let mut list = list();
        list.process_record(&record(json!({"path": "/a", "thumbnail": "t1"})), "/p");

        assert_eq!(
            list.value(),
            vec![row(&[("path", json!("/a")), ("thumbnail", json!("t1"))])]
        );
    }

    #[test]
    fn absent_record_clears_rows() {
        let mut list = list();
        list.add_item(None);
        list.process_record(&record(json!({"thumbnail": ["t1"]})), "/p");

        assert!(list.is_empty());
        assert!(list.registry().fields().is_empty());
    }

    #[test]
    fn veto_aborts_before_touching_rows() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut list = list();
        list.add_item(Some(&row(&[("path", json!("/keep"))])));
        list.add_listener(Box::new(Recorder {
            events: events.clone(),
            veto: true,
        }));

        let outcome = list.process_record(&record(json!({"path": ["/x"]})), "/p");

        assert_eq!(outcome, LoadOutcome::Vetoed);
        assert_eq!(list.value()[0]["path"], json!("/keep"));
        assert_eq!(*events.borrow(), vec!["before /p".to_string()]);
    }

    #[test]
    fn events_fire_in_order_with_old_value() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut list = list();
        list.add_item(None);
        list.add_listener(Box::new(Recorder {
            events: events.clone(),
            veto: false,
        }));

        let loaded = record(json!({"path": ["/a", "/b"], "thumbnail": ["1", "2"]}));
        list.process_record(&loaded, "/p");

        assert_eq!(
            *events.borrow(),
            vec![
                "before /p".to_string(),
                "change 2<-1".to_string(),
                "load /p".to_string()
            ]
        );
    }

    #[test]
    fn capacity_refuses_after_limit() {
        let mut template = GroupTemplate::default();
        template.max_items = 3;
        let mut list = FieldGroupList::new(template).unwrap();

        for _ in 0..3 {
            assert!(list.add_item(None).is_some());
        }
        assert!(list.add_item(None).is_none());
        assert_eq!(list.len(), 3);
        assert!(!list.dispatch(RowCommand::Add));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn default_capacity_is_twelve() {
        let mut list = list();
        while list.add_item(None).is_some() {}
        assert_eq!(list.len(), 12);
    }

    #[test]
    fn loads_are_capped_at_capacity() {
        let mut template = GroupTemplate::default();
        template.max_items = 3;
        let mut list = FieldGroupList::new(template).unwrap();

        let outcome = list.process_record(
            &record(json!({"path": ["/a", "/b", "/c", "/d", "/e"]})),
            "/p",
        );

        assert_eq!(outcome, LoadOutcome::Loaded { rows: 3 });
        let paths: Vec<Value> = list.value().iter().map(|r| r["path"].clone()).collect();
        assert_eq!(paths, vec![json!("/a"), json!("/b"), json!("/c")]);
        assert_eq!(list.registry().fields().len(), 6);
        assert!(list.add_item(None).is_none());
    }

    #[test]
    fn set_value_normalizes_input() {
        let mut list = list();
        list.set_value(ListValue::from_json(&json!({"path": "/single"})));
        assert_eq!(list.len(), 1);

        list.set_value(ListValue::from_json(&json!("")));
        assert!(list.is_empty());

        list.set_value(ListValue::from_json(&json!([{"path": "/a"}, {"path": "/b"}])));
        assert_eq!(list.len(), 2);
        assert_eq!(list.value()[1]["path"], json!("/b"));
    }

    #[test]
    fn registry_tracks_rows() {
        let mut list = list();
        let a = list.add_item(None).unwrap();
        let b = list.add_item(None).unwrap();
        assert_eq!(list.registry().fields().len(), 4);

        assert!(list.dispatch(RowCommand::Remove(a)));
        let names: Vec<&str> = list.registry().fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["path", "thumbnail"]);
        assert!(list.registry().fields().iter().all(|f| f.row == b));

        list.set_value(ListValue::Empty);
        assert!(list.registry().fields().is_empty());
    }

    #[test]
    fn move_commands_swap_values_not_rows() {
        let mut list = list();
        list.set_value(vec![
            row(&[("path", json!("/a"))]),
            row(&[("path", json!("/b"))]),
            row(&[("path", json!("/c"))]),
        ]);
        let ids: Vec<RowId> = list.rows().iter().map(|r| r.id()).collect();

        assert!(list.dispatch(RowCommand::MoveUp(ids[2])));
        let paths: Vec<Value> = list.value().iter().map(|r| r["path"].clone()).collect();
        assert_eq!(paths, vec![json!("/a"), json!("/c"), json!("/b")]);
        let after: Vec<RowId> = list.rows().iter().map(|r| r.id()).collect();
        assert_eq!(after, ids);

        assert!(!list.dispatch(RowCommand::MoveUp(ids[0])));
        assert!(!list.dispatch(RowCommand::MoveDown(ids[2])));
        assert!(list.dispatch(RowCommand::MoveDown(ids[0])));
        assert_eq!(list.value()[0]["path"], json!("/c"));
    }

    #[test]
    fn read_only_ignores_commands() {
        let template = parse_group_template(
            r#"{"name":"g","readOnly":true,"fieldConfig":{"items":[{"name":"a"},{"name":"b"}]}}"#,
        )
        .unwrap();
        let mut list = FieldGroupList::new(template).unwrap();
        list.set_value(vec![row(&[("a", json!("1"))]), row(&[("a", json!("2"))])]);
        let first = list.rows()[0].id();

        assert!(!list.has_add_control());
        assert!(!list.dispatch(RowCommand::Add));
        assert!(!list.dispatch(RowCommand::MoveDown(first)));
        assert!(!list.dispatch(RowCommand::Remove(first)));
        assert!(!list.edit_field(first, "a", json!("x")));
        assert_eq!(list.len(), 2);
        assert_eq!(list.delete_markers().len(), 2);
    }

    #[test]
    fn read_only_template_locks_sub_fields() {
        let template = GroupTemplate {
            read_only: true,
            ..GroupTemplate::default()
        };
        let mut list = FieldGroupList::new(template).unwrap();
        list.set_value(vec![row(&[("path", json!("/a"))])]);
        let id = list.rows()[0].id();

        assert!(list.rows()[0].fields().iter().all(|f| f.is_read_only()));
        assert!(!list.edit_field(id, "path", json!("/changed")));
        assert_eq!(list.value()[0]["path"], json!("/a"));
    }

    #[test]
    fn enable_cascades_to_hidden_fields_and_rows() {
        let mut template = GroupTemplate::default();
        template.type_hint = Some("String".into());
        let mut list = FieldGroupList::new(template).unwrap();
        list.add_item(None);
        list.add_item(None);

        list.set_enabled(false);
        assert!(list.delete_markers().values().all(|m| !m.is_enabled()));
        assert!(!list.type_hint().unwrap().is_enabled());
        assert!(
            list.rows()
                .iter()
                .flat_map(|r| r.fields())
                .all(|f| !f.is_enabled())
        );

        let late = list.add_item(None).unwrap();
        assert!(find(&list, late).fields().iter().all(|f| !f.is_enabled()));

        list.set_enabled(true);
        assert!(list.delete_markers().values().all(|m| m.is_enabled()));
        assert!(list.type_hint().unwrap().is_enabled());
        assert!(
            list.rows()
                .iter()
                .flat_map(|r| r.fields())
                .all(|f| f.is_enabled())
        );
    }

    #[test]
    fn hidden_fields_match_declared_names() {
        let mut template = GroupTemplate::default();
        template.type_hint = Some("String".into());
        let list = FieldGroupList::new(template).unwrap();

        let names: Vec<&str> = list.delete_markers().values().map(|m| m.name()).collect();
        assert_eq!(names, vec!["path@Delete", "thumbnail@Delete"]);
        assert_eq!(list.type_hint().unwrap().name(), "./stories@TypeHint");
        assert_eq!(list.type_hint().unwrap().value(), "String[]");
        assert!(list.field_names().iter().all(|n| list.delete_markers().contains_key(n)));
    }

    #[test]
    fn path_reaches_path_fields_of_new_rows() {
        let mut list = list();
        list.process_path("/content/site/page");
        assert_eq!(list.path(), "/content/site/page");
        let id = list.add_item(None).unwrap();

        let row = find(&list, id);
        assert!(row.fields().iter().all(|f| *f.kind() == SubFieldKind::PathField));
        assert!(row.fields().iter().all(|f| f.path() == Some("/content/site/page")));
    }

    #[test]
    fn field_names_are_per_instance() {
        let a = list();
        let b = list();
        assert_eq!(a.field_names(), b.field_names());
        assert_eq!(a.field_names().len(), 2);
    }
}
