// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fb-storage: component F, the append-only rotating log sink (spec §4.F).
//!
//! Every append rewrites the current date-partitioned file in full,
//! trading write cost for "trivially valid JSON on crash" (spec §9).
//! A single mutex serializes every writer; a per-date cache tracks the
//! buffered entries and current file number so appends don't have to
//! re-read the file they are about to overwrite.

mod error;
mod paths;
mod query;
mod retention;
mod sink;

pub use error::StorageError;
pub use paths::log_file_name;
pub use query::{run_query, LogPage, LogQuery};
pub use retention::{parse_date_from_filename, run_retention, spawn_retention_loop, RetentionOutcome};
pub use sink::{LogAppender, LogSink, RecordingSink};
