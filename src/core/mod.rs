pub mod checklist;
pub mod collate;
pub mod display;
pub mod engine;
pub mod export;
pub mod flow;
pub mod ingest;
pub mod mapper;
pub mod repository;
pub mod validator;

pub use crate::domain::model::{ColumnSelection, NormalizedRecord, RawRecord, RowId};
pub use crate::domain::ports::{KeyValueStore, SheetSource};
pub use crate::utils::error::Result;
