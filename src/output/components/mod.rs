mod summary_table;

pub use summary_table::SummaryTable;
