//! I/O handling for the CSV replay front-end
//!
//! - [`csv_format`] - record shapes, record-to-operation conversion, and
//!   wallet state output
//! - [`sync_reader`] - streaming iterator over a CSV file
//! - [`async_reader`] - batch streaming over any async byte source

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use csv_format::{convert_operation_record, write_wallets_csv, Operation, OperationRecord};
pub use sync_reader::SyncReader;
