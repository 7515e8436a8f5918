//! Statement execution and result normalization.

mod executor;

pub use executor::{execute, truncate_for_log, SQL_LOG_LIMIT};
