//! CLI operation handlers.
//!
//! - [`run`]: ingest the configured repository and print the reports
//!
//! Output formatting utilities are in [`output`].

pub mod output;
pub mod run;
