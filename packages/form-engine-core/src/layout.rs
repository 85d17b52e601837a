//! Column layout derived from the flat schema.
//!
//! Columns are recomputed on every read and borrow from the schema; they have
//! no identity beyond their index.

use crate::schema::{FieldDescriptor, Schema};

/// A run of non-break fields between two column breaks.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<'a> {
    /// Zero-based column index
    pub index: usize,
    /// Schema index of the column break that opens this column (`None` for the first)
    pub opened_by: Option<usize>,
    /// Fields in order
    pub fields: Vec<&'a FieldDescriptor>,
}

impl<'a> Column<'a> {
    /// Empty columns still render as drop targets.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Field names in order.
    pub fn field_names(&self) -> Vec<&'a str> {
        self.fields.iter().map(|f| f.field_name.as_str()).collect()
    }
}

/// Splits the schema into columns at each `ColumnBreak`.
///
/// A schema with `k` column breaks always yields `k + 1` columns, empty ones
/// included. Layout breaks do not start a column and are not listed.
pub fn split_into_columns(schema: &Schema) -> Vec<Column<'_>> {
    let mut columns = Vec::new();
    let mut current = Column {
        index: 0,
        opened_by: None,
        fields: Vec::new(),
    };

    for (position, field) in schema.fields().iter().enumerate() {
        if field.is_column_break() {
            let next = Column {
                index: current.index + 1,
                opened_by: Some(position),
                fields: Vec::new(),
            };
            columns.push(std::mem::replace(&mut current, next));
        } else if !field.is_break() {
            current.fields.push(field);
        }
    }
    columns.push(current);

    columns
}

/// Schema index at which a field dropped into `column_index` is appended:
/// just before the column break that closes the column, or the end of the
/// schema for the last column.
///
/// # Returns
/// `None` if the column does not exist.
pub fn column_insertion_index(schema: &Schema, column_index: usize) -> Option<usize> {
    let breaks = schema.column_break_positions();
    if column_index > breaks.len() {
        return None;
    }
    Some(breaks.get(column_index).copied().unwrap_or(schema.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;
    use proptest::prelude::*;

    fn text(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, name.to_uppercase(), FieldType::Text)
    }

    fn schema(fields: Vec<FieldDescriptor>) -> Schema {
        Schema::with_fields("Layout", fields).unwrap()
    }

    fn shape(schema: &Schema) -> Vec<Vec<&str>> {
        split_into_columns(schema)
            .iter()
            .map(|c| c.field_names())
            .collect()
    }

    #[test]
    fn test_field_names_borrow_the_schema() {
        let s = schema(vec![text("a"), FieldDescriptor::column_break(), text("b")]);
        let names: Vec<&str> = split_into_columns(&s)
            .into_iter()
            .flat_map(|column| column.field_names())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_split_example() {
        let s = schema(vec![
            text("a"),
            FieldDescriptor::column_break(),
            text("b"),
            text("c"),
        ]);
        assert_eq!(shape(&s), vec![vec!["a"], vec!["b", "c"]]);
        let columns = split_into_columns(&s);
        assert_eq!(columns[0].opened_by, None);
        assert_eq!(columns[1].opened_by, Some(1));
    }

    #[test]
    fn test_empty_schema_has_one_column() {
        let s = Schema::new("Empty");
        let columns = split_into_columns(&s);
        assert_eq!(columns.len(), 1);
        assert!(columns[0].is_empty());
    }

    #[test]
    fn test_empty_columns_are_kept() {
        let s = schema(vec![
            FieldDescriptor::column_break(),
            FieldDescriptor::column_break(),
            text("a"),
            FieldDescriptor::column_break(),
        ]);
        assert_eq!(shape(&s), vec![vec![], vec![], vec!["a"], vec![]]);
    }

    #[test]
    fn test_layout_break_does_not_split() {
        let s = schema(vec![text("a"), FieldDescriptor::layout_break(), text("b")]);
        assert_eq!(shape(&s), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_insertion_index() {
        let s = schema(vec![
            text("a"),
            FieldDescriptor::column_break(),
            FieldDescriptor::column_break(),
            text("b"),
        ]);
        assert_eq!(column_insertion_index(&s, 0), Some(1));
        assert_eq!(column_insertion_index(&s, 1), Some(2));
        assert_eq!(column_insertion_index(&s, 2), Some(4));
        assert_eq!(column_insertion_index(&s, 3), None);
    }

    proptest! {
        #[test]
        fn prop_split_has_breaks_plus_one_columns(kinds in proptest::collection::vec(any::<bool>(), 0..30)) {
            let fields: Vec<FieldDescriptor> = kinds
                .iter()
                .enumerate()
                .map(|(i, brk)| if *brk { FieldDescriptor::column_break() } else { text(&format!("f{}", i)) })
                .collect();
            let s = schema(fields);
            let columns = split_into_columns(&s);
            prop_assert_eq!(columns.len(), s.column_break_positions().len() + 1);

            // Re-interleaving columns with breaks rebuilds the original list.
            let mut rebuilt = Vec::new();
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    rebuilt.push(String::new());
                }
                rebuilt.extend(column.field_names().into_iter().map(str::to_string));
            }
            let original: Vec<String> = s.fields().iter().map(|f| f.field_name.clone()).collect();
            prop_assert_eq!(rebuilt, original);

            prop_assert_eq!(split_into_columns(&s), columns);
        }
    }
}
