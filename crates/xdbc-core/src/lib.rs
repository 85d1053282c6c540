//! Core types and traits for the xdbc access layer.
//!
//! This crate provides the pieces shared by the access layer and the
//! engines it drives:
//!
//! - [`SqlError`], the single structured failure type
//! - [`ColumnType`] and [`ColumnDesc`] for result metadata
//! - [`Value`] cells and the [`FromValue`] extraction trait
//! - the handle-based engine boundary ([`Engine`] and its handle traits)

pub mod engine;
pub mod error;
pub mod types;
pub mod value;

pub use engine::{
    ConnectionHandle, Engine, EngineMeta, EngineResult, EngineRow, Param, ResultHandle,
    StatementHandle,
};
pub use error::{CONNECTION_CLOSED, Result, STATUS_OK, SqlError};
pub use types::{ColumnDesc, ColumnMetadata, ColumnType};
pub use value::{FromValue, Value};
