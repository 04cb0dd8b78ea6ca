// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for table validation and coercion.

use thiserror::Error;

use crate::column::ColumnType;

/// Failure to validate or coerce a table against its [`crate::TableSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A non-nullable column without default is absent.
    #[error("table {table}: missing required column `{column}`")]
    MissingColumn {
        /// Schema name.
        table: &'static str,
        /// Column name.
        column: String,
    },
    /// A column that the schema does not declare.
    #[error("table {table}: unknown column `{column}`")]
    UnknownColumn {
        /// Schema name.
        table: &'static str,
        /// Column name.
        column: String,
    },
    /// A null value in a non-nullable column.
    #[error("table {table}: null value in non-nullable column `{column}` (row {row})")]
    NullValue {
        /// Schema name.
        table: &'static str,
        /// Column name.
        column: String,
        /// Zero-based row index.
        row: usize,
    },
    /// A value that cannot be coerced to the declared column type.
    #[error("table {table}: column `{column}` expects {expected}, got {found} (row {row})")]
    TypeMismatch {
        /// Schema name.
        table: &'static str,
        /// Column name.
        column: String,
        /// Zero-based row index.
        row: usize,
        /// Declared column type.
        expected: ColumnType,
        /// Kind of the offending value.
        found: String,
    },
    /// An integer outside the 32-bit range of an `int32` column.
    #[error("table {table}: value {value} in column `{column}` does not fit int32 (row {row})")]
    OutOfRange {
        /// Schema name.
        table: &'static str,
        /// Column name.
        column: String,
        /// Zero-based row index.
        row: usize,
        /// Offending value.
        value: i64,
    },
    /// Columns passed to a table builder have incompatible lengths.
    #[error("table {table}: column `{column}` has {found} values, expected {expected} or 1")]
    LengthMismatch {
        /// Schema name.
        table: &'static str,
        /// Column name.
        column: String,
        /// Length of the longest column.
        expected: usize,
        /// Length of this column.
        found: usize,
    },
    /// Two tables with different schemas were combined.
    #[error("cannot combine table {found} into table {expected}")]
    SchemaMismatch {
        /// Schema of the receiving table.
        expected: &'static str,
        /// Schema of the incoming table.
        found: &'static str,
    },
    /// A timestamp string that matches none of the accepted formats.
    #[error("invalid timestamp `{0}`")]
    InvalidTimestamp(String),
}
