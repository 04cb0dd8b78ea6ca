// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Column and table descriptors.
//!
//! Schemas are plain `static` data. Validation in [`crate::table`] walks these
//! descriptors; nothing is generated per table.

use std::fmt;

use crate::value::Value;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// 32-bit signed integer.
    Int32,
    /// 64-bit float.
    Float64,
    /// UTF-8 string.
    String,
    /// Boolean.
    Bool,
    /// Offset-free timestamp.
    DateTime,
    /// WKT geometry string.
    Geometry,
}

impl ColumnType {
    /// Lowercase type name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Bool => "bool",
            Self::DateTime => "datetime",
            Self::Geometry => "geometry",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Default used when a column is absent from the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    /// Integer default.
    Int(i64),
    /// Float default.
    Float(f64),
    /// String default.
    Str(&'static str),
    /// Boolean default.
    Bool(bool),
}

impl Fill {
    /// Materializes the default as a cell value.
    pub fn to_value(self) -> Value {
        match self {
            Self::Int(v) => Value::Int(v),
            Self::Float(v) => Value::Float(v),
            Self::Str(v) => Value::Str(v.to_owned()),
            Self::Bool(v) => Value::Bool(v),
        }
    }
}

/// One column: name, type, nullability and optional default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDef {
    /// Column name.
    pub name: &'static str,
    /// Semantic type.
    pub ty: ColumnType,
    /// Whether nulls are allowed.
    pub nullable: bool,
    /// Value used when the column is absent.
    pub default: Option<Fill>,
}

impl ColumnDef {
    /// Non-nullable column without default.
    pub const fn required(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            nullable: false,
            default: None,
        }
    }

    /// Nullable column; absent means null.
    pub const fn nullable(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            nullable: true,
            default: None,
        }
    }

    /// Same column with a default for absent values.
    pub const fn with_default(self, fill: Fill) -> Self {
        Self {
            default: Some(fill),
            ..self
        }
    }
}

/// Declarative description of one persisted table.
#[derive(Debug, PartialEq)]
pub struct TableSchema {
    /// Human readable name, e.g. `Basin / profile`.
    pub name: &'static str,
    /// Declared columns in persisted order.
    pub columns: &'static [ColumnDef],
    /// Columns rows are sorted by when persisted (stable sort).
    pub sort_keys: &'static [&'static str],
    /// Whether undeclared columns are kept instead of rejected.
    pub extra_columns: bool,
}

impl TableSchema {
    /// Looks up a declared column.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns `true` if the schema declares `name`.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}
