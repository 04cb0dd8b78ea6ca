// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Attribute tables for hydronet models.
//!
//! Every persisted table is described by a static [`TableSchema`] (see
//! [`tables`]). A single data-driven routine, [`validate`], checks and coerces
//! rows against those descriptors; callers never hand-write per-table code.

pub mod column;
pub mod error;
pub mod table;
pub mod tables;
pub mod timestamp;
pub mod value;

pub use column::{ColumnDef, ColumnType, Fill, TableSchema};
pub use error::SchemaError;
pub use table::{validate, Columns, Row, Table};
pub use timestamp::Timestamp;
pub use value::Value;
