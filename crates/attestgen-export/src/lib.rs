//! # attestgen export
//!
//! Maps signed attestations to the four-column row format consumed by the
//! indexer and writes batches of rows to disk.
//!
//! ## Key Types
//!
//! - [`RowEncoder`] - `(id, timestamp, schema_id, payload)` per attestation
//! - [`Clock`] - Injected time source for row timestamps and file names
//! - [`OutputPathResolver`] - Injected file naming
//! - [`CsvFileSink`] - `;`-delimited writer
//!
//! ## Row format
//!
//! ```text
//! <hex ordinal+1>;<unix ms>;<schema id>;<signed attestation JSON>
//! ```

pub mod clock;
pub mod error;
pub mod row;
pub mod schema_id;
pub mod sink;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ExportError, Result};
pub use row::{ExportRow, RowEncoder};
pub use schema_id::{schema_id, schema_id_for, SCHEMA_ID_SENTINEL};
pub use sink::{render_rows, CsvFileSink, OutputPathResolver, TimestampedPath, DELIMITER};
