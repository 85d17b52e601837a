//! Builder state machine over a schema.
//!
//! States are `Viewing` and `EditingField`. Opening a second field while one
//! is being edited drops the first field's unsaved draft without saving it.
//! Every mutation either applies fully or leaves the schema untouched.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::error::{FormError, Result};
use crate::layout::{self, Column};
use crate::schema::{FieldDescriptor, FieldType, Schema};

/// Builder state.
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderState {
    /// Read-only list
    Viewing,
    /// One field's settings are open; `draft` holds unsaved changes
    EditingField {
        field_name: String,
        draft: FieldDescriptor,
    },
}

/// Where a dragged field was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Final index in the flat schema list
    Position(usize),
    /// Drop zone of a column (used for empty columns)
    Column(usize),
}

/// Field name for a newly added field: label lower-cased, spaces as underscores.
pub fn derive_field_name(label: &str) -> String {
    label.trim().to_lowercase().replace(' ', "_")
}

/// Interactive mutation surface over one schema.
#[derive(Debug, Clone)]
pub struct Builder {
    schema: Schema,
    state: BuilderState,
    /// Fields added in this session and not yet persisted
    unsaved: HashSet<String>,
    next_placeholder: u32,
    config: EngineConfig,
}

impl Builder {
    /// Starts a builder session over a copy of the schema.
    pub fn new(schema: Schema) -> Self {
        Self::with_config(schema, EngineConfig::default())
    }

    pub fn with_config(schema: Schema, config: EngineConfig) -> Self {
        Self {
            schema,
            state: BuilderState::Viewing,
            unsaved: HashSet::new(),
            next_placeholder: 1,
            config,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Ends the session, returning the mutated schema for persistence.
    pub fn into_schema(self) -> Schema {
        self.schema
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    /// Current column layout.
    pub fn columns(&self) -> Vec<Column<'_>> {
        layout::split_into_columns(&self.schema)
    }

    /// Name of the field open for editing, if any.
    pub fn editing(&self) -> Option<&str> {
        match &self.state {
            BuilderState::EditingField { field_name, .. } => Some(field_name.as_str()),
            BuilderState::Viewing => None,
        }
    }

    /// Unsaved settings of the field being edited.
    pub fn draft(&self) -> Option<&FieldDescriptor> {
        match &self.state {
            BuilderState::EditingField { draft, .. } => Some(draft),
            BuilderState::Viewing => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut FieldDescriptor> {
        match &mut self.state {
            BuilderState::EditingField { draft, .. } => Some(draft),
            BuilderState::Viewing => None,
        }
    }

    /// Returns true if the field was added in this session and not persisted.
    pub fn is_unsaved(&self, field_name: &str) -> bool {
        self.unsaved.contains(field_name)
    }

    /// Forgets which fields are new, once the schema has been persisted.
    pub fn mark_persisted(&mut self) {
        self.unsaved.clear();
    }

    /// Adds a blank field of the given type after `after_index`
    /// (or at the end when `None`).
    ///
    /// # Returns
    /// The placeholder name of the new field.
    pub fn add_field(&mut self, field_type: FieldType, after_index: Option<usize>) -> Result<String> {
        let field_name = self.placeholder_name();
        let mut descriptor = FieldDescriptor::new(field_name.clone(), "", field_type);
        descriptor.order = self.schema.len() as u32 + 1;
        let at_index = after_index.map_or(self.schema.len(), |index| index.saturating_add(1));

        self.schema.insert(descriptor, at_index).inspect_err(|e| {
            tracing::warn!("Add field rejected: {}", e);
        })?;
        self.unsaved.insert(field_name.clone());
        tracing::debug!("Added field {} at {}", field_name, at_index);
        Ok(field_name)
    }

    /// Appends a column break, opening a new empty trailing column.
    pub fn add_column_break(&mut self) {
        let at_end = self.schema.len();
        // Breaks are exempt from the name check, so insert cannot fail.
        if let Err(e) = self.schema.insert(FieldDescriptor::column_break(), at_end) {
            tracing::warn!("Add column break rejected: {}", e);
        }
    }

    /// Removes the column break that opens `column_index`, merging the column
    /// into the previous one. Column 0 has no opening break: no-op.
    pub fn remove_column_break(&mut self, column_index: usize) -> Result<()> {
        if column_index == 0 {
            return Ok(());
        }
        let breaks = self.schema.column_break_positions();
        let Some(&position) = breaks.get(column_index - 1) else {
            let e = FormError::ColumnNotFound {
                index: column_index,
                count: breaks.len() + 1,
            };
            tracing::warn!("Remove column break ignored: {}", e);
            return Err(e);
        };
        self.schema.remove_at(position);
        Ok(())
    }

    /// Removes a field. Closes its settings if they were open.
    pub fn remove_field(&mut self, field_name: &str) -> Result<FieldDescriptor> {
        let removed = self.schema.remove(field_name).inspect_err(|e| {
            tracing::warn!("Remove field ignored: {}", e);
        })?;
        self.unsaved.remove(field_name);
        if self.editing() == Some(field_name) {
            self.state = BuilderState::Viewing;
        }
        Ok(removed)
    }

    /// Applies a drop event for a dragged field.
    ///
    /// A column target resolves to the slot just before the column break that
    /// closes the column (end of schema for the last column), computed with
    /// the dragged field already taken out of the list.
    pub fn reorder(&mut self, field_name: &str, target: DropTarget) -> Result<()> {
        let result = match target {
            DropTarget::Position(index) => self.schema.move_field(field_name, index),
            DropTarget::Column(column_index) => self.move_to_column(field_name, column_index),
        };
        if let Err(e) = &result {
            tracing::warn!("Reorder of {} ignored: {}", field_name, e);
        }
        result
    }

    /// Opens a field's settings. Any other open draft is discarded unsaved.
    pub fn begin_edit(&mut self, field_name: &str) -> Result<()> {
        let draft = self
            .schema
            .get(field_name)
            .cloned()
            .ok_or_else(|| self.schema.not_found(field_name))?;
        if let Some(previous) = self.editing() {
            if previous != field_name {
                tracing::debug!("Discarding unsaved edits on {}", previous);
            }
        }
        self.state = BuilderState::EditingField {
            field_name: field_name.to_string(),
            draft,
        };
        Ok(())
    }

    /// Closes the open settings without saving.
    pub fn cancel_edit(&mut self) {
        self.state = BuilderState::Viewing;
    }

    /// Saves the open draft.
    pub fn save_draft(&mut self) -> Result<String> {
        match &self.state {
            BuilderState::EditingField { field_name, draft } => {
                let (field_name, draft) = (field_name.clone(), draft.clone());
                self.save_field_edits(&field_name, draft)
            }
            BuilderState::Viewing => Err(FormError::InvalidEditState(String::new())),
        }
    }

    /// Saves edited settings for the field currently open for editing.
    ///
    /// A field added in this session takes its name from the new label when
    /// the label changed. Existing fields keep their name; only the label and
    /// other settings change. The field keeps its position.
    ///
    /// # Returns
    /// The field's name after saving.
    pub fn save_field_edits(&mut self, field_name: &str, updated: FieldDescriptor) -> Result<String> {
        if self.editing() != Some(field_name) {
            return Err(FormError::InvalidEditState(field_name.to_string()));
        }
        let index = self
            .schema
            .position(field_name)
            .ok_or_else(|| self.schema.not_found(field_name))?;
        let original = &self.schema.fields()[index];
        if updated.field_type.is_break() != original.field_type.is_break() {
            let e = FormError::Validation {
                field: field_name.to_string(),
                message: format!(
                    "cannot change type from {} to {}",
                    original.field_type.as_str(),
                    updated.field_type.as_str()
                ),
            };
            tracing::warn!("Save of {} rejected: {}", field_name, e);
            return Err(e);
        }

        let new_name = if self.unsaved.contains(field_name)
            && updated.label != original.label
            && !derive_field_name(&updated.label).is_empty()
        {
            derive_field_name(&updated.label)
        } else {
            original.field_name.clone()
        };
        if new_name != field_name && self.schema.contains(&new_name) {
            let e = self.schema.duplicate(&new_name);
            tracing::warn!("Save of {} rejected: {}", field_name, e);
            return Err(e);
        }

        let mut descriptor = updated;
        descriptor.field_name = new_name.clone();
        self.schema.replace_at(index, descriptor);
        if self.unsaved.remove(field_name) {
            self.unsaved.insert(new_name.clone());
        }
        self.state = BuilderState::Viewing;
        Ok(new_name)
    }

    fn move_to_column(&mut self, field_name: &str, column_index: usize) -> Result<()> {
        let mut next = self.schema.clone();
        let field = next.remove(field_name)?;
        let count = next.column_break_positions().len() + 1;
        let index = layout::column_insertion_index(&next, column_index).ok_or(
            FormError::ColumnNotFound {
                index: column_index,
                count,
            },
        )?;
        next.insert(field, index)?;
        self.schema = next;
        Ok(())
    }

    fn placeholder_name(&mut self) -> String {
        loop {
            let name = format!("{}_{}", self.config.new_field_prefix, self.next_placeholder);
            self.next_placeholder += 1;
            if !self.schema.contains(&name) {
                return name;
            }
        }
    }
}
