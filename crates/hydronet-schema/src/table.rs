// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Row tables bound to a schema, and the data-driven validator.

use std::collections::BTreeMap;

use crate::column::{ColumnDef, ColumnType, TableSchema};
use crate::error::SchemaError;
use crate::timestamp::Timestamp;
use crate::value::Value;

/// One table row, keyed by column name.
pub type Row = BTreeMap<String, Value>;

/// Column-oriented input for building a table.
///
/// Columns of length 1 are broadcast to the length of the longest column,
/// so `Columns::new().scalar("area", 100.0).col("level", [0.0, 10.0])`
/// yields two rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    columns: Vec<(String, Vec<Value>)>,
}

impl Columns {
    /// Empty column set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a column.
    pub fn col<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if let Some(slot) = self.columns.iter_mut().find(|(n, _)| n == name) {
            slot.1 = values;
        } else {
            self.columns.push((name.to_owned(), values));
        }
        self
    }

    /// Adds a single-value column (broadcast to every row).
    pub fn scalar<V: Into<Value>>(self, name: &str, value: V) -> Self {
        self.col(name, [value])
    }

    /// Returns `true` when no column was added.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Expands the columns into rows, broadcasting length-1 columns.
    pub fn into_rows(self, table: &'static str) -> Result<Vec<Row>, SchemaError> {
        let len = self.columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        for (name, values) in &self.columns {
            if values.len() != len && values.len() != 1 {
                return Err(SchemaError::LengthMismatch {
                    table,
                    column: name.clone(),
                    expected: len,
                    found: values.len(),
                });
            }
        }
        let rows = (0..len)
            .map(|i| {
                self.columns
                    .iter()
                    .map(|(name, values)| {
                        let value = if values.len() == 1 { &values[0] } else { &values[i] };
                        (name.clone(), value.clone())
                    })
                    .collect()
            })
            .collect();
        Ok(rows)
    }
}

/// Validates and coerces rows against `schema`.
///
/// Absent columns take their default (or null when nullable), integers widen
/// to floats, integral floats narrow to `int32`, strings parse into
/// timestamps. Undeclared columns are rejected unless the schema allows
/// extra columns.
pub fn validate(schema: &'static TableSchema, rows: Vec<Row>) -> Result<Vec<Row>, SchemaError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| validate_row(schema, index, row))
        .collect()
}

fn validate_row(
    schema: &'static TableSchema,
    index: usize,
    mut row: Row,
) -> Result<Row, SchemaError> {
    if !schema.extra_columns {
        if let Some(unknown) = row.keys().find(|k| !schema.has_column(k)) {
            return Err(SchemaError::UnknownColumn {
                table: schema.name,
                column: unknown.clone(),
            });
        }
    }
    for col in schema.columns {
        let value = match row.remove(col.name) {
            Some(value) => value,
            None => match (col.default, col.nullable) {
                (Some(fill), _) => fill.to_value(),
                (None, true) => Value::Null,
                (None, false) => {
                    return Err(SchemaError::MissingColumn {
                        table: schema.name,
                        column: col.name.to_owned(),
                    })
                }
            },
        };
        let value = coerce(schema.name, col, index, value)?;
        row.insert(col.name.to_owned(), value);
    }
    Ok(row)
}

fn coerce(
    table: &'static str,
    col: &ColumnDef,
    row: usize,
    value: Value,
) -> Result<Value, SchemaError> {
    let mismatch = |found: &Value| SchemaError::TypeMismatch {
        table,
        column: col.name.to_owned(),
        row,
        expected: col.ty,
        found: found.kind().to_owned(),
    };
    // Non-finite floats have no JSON form and count as missing.
    let value = match value {
        Value::Float(v) if !v.is_finite() => Value::Null,
        other => other,
    };
    if value.is_null() {
        return if col.nullable {
            Ok(Value::Null)
        } else {
            Err(SchemaError::NullValue {
                table,
                column: col.name.to_owned(),
                row,
            })
        };
    }
    match (col.ty, value) {
        (ColumnType::Int32, Value::Int(v)) => int32(table, col, row, v),
        #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
        (ColumnType::Int32, Value::Float(v)) if v.fract() == 0.0 && v.is_finite() => {
            int32(table, col, row, v as i64)
        }
        #[allow(clippy::cast_precision_loss)]
        (ColumnType::Float64, Value::Int(v)) => Ok(Value::Float(v as f64)),
        (ColumnType::Float64, v @ Value::Float(_))
        | (ColumnType::String | ColumnType::Geometry, v @ Value::Str(_))
        | (ColumnType::Bool, v @ Value::Bool(_))
        | (ColumnType::DateTime, v @ Value::Time(_)) => Ok(v),
        (ColumnType::Bool, Value::Int(v)) if v == 0 || v == 1 => Ok(Value::Bool(v == 1)),
        (ColumnType::DateTime, Value::Str(s)) => s
            .parse::<Timestamp>()
            .map(Value::Time)
            .map_err(|_| mismatch(&Value::Str(s))),
        (_, other) => Err(mismatch(&other)),
    }
}

fn int32(table: &'static str, col: &ColumnDef, row: usize, v: i64) -> Result<Value, SchemaError> {
    if i32::try_from(v).is_ok() {
        Ok(Value::Int(v))
    } else {
        Err(SchemaError::OutOfRange {
            table,
            column: col.name.to_owned(),
            row,
            value: v,
        })
    }
}

/// Validated rows bound to their schema.
#[derive(Debug, Clone)]
pub struct Table {
    schema: &'static TableSchema,
    rows: Vec<Row>,
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name == other.schema.name && self.rows == other.rows
    }
}

impl Table {
    /// Empty table for `schema`.
    pub fn new(schema: &'static TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Validates `rows` against `schema`.
    pub fn from_rows(schema: &'static TableSchema, rows: Vec<Row>) -> Result<Self, SchemaError> {
        Ok(Self {
            schema,
            rows: validate(schema, rows)?,
        })
    }

    /// Broadcasts `columns` into rows and validates them.
    pub fn from_columns(
        schema: &'static TableSchema,
        columns: Columns,
    ) -> Result<Self, SchemaError> {
        let rows = columns.into_rows(schema.name)?;
        Self::from_rows(schema, rows)
    }

    /// The schema rows were validated against.
    pub fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consumes the table, returning its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, skipping rows that lack it.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().filter_map(move |row| row.get(name))
    }

    /// Sets `name` to `value` on every row, coercing to the declared type.
    pub fn set_column(&mut self, name: &str, value: Value) -> Result<(), SchemaError> {
        let value = match self.schema.column(name) {
            Some(col) => coerce(self.schema.name, col, 0, value)?,
            None if self.schema.extra_columns => value,
            None => {
                return Err(SchemaError::UnknownColumn {
                    table: self.schema.name,
                    column: name.to_owned(),
                })
            }
        };
        for row in &mut self.rows {
            row.insert(name.to_owned(), value.clone());
        }
        Ok(())
    }

    /// Appends the rows of `other`, which must share this table's schema.
    pub fn append(&mut self, other: Self) -> Result<(), SchemaError> {
        if self.schema.name != other.schema.name {
            return Err(SchemaError::SchemaMismatch {
                expected: self.schema.name,
                found: other.schema.name,
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Copy with rows stably sorted by the schema's sort keys.
    pub fn sorted(&self) -> Self {
        let mut rows = self.rows.clone();
        let keys = self.schema.sort_keys;
        if !keys.is_empty() {
            rows.sort_by(|a, b| {
                keys.iter()
                    .map(|k| match (a.get(*k), b.get(*k)) {
                        (Some(x), Some(y)) => x.sort_cmp(y),
                        (x, y) => x.is_some().cmp(&y.is_some()),
                    })
                    .find(|o| o.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        Self {
            schema: self.schema,
            rows,
        }
    }
}
