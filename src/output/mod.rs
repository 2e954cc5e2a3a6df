//! Terminal presentation of reports: a rich table and colored speedup when
//! attached to a TTY, plain lines when piped, a single JSON document with
//! `--json`.

pub mod components;
pub mod context;
pub mod theme;

pub use components::SummaryTable;
pub use context::{OutputContext, OutputMode};
pub use theme::Theme;
