pub mod table;

pub use table::{DataTable, Output, OutputFormat, TableDisplay};
