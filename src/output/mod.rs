//! Output formatting for log lines

pub mod formatters;
