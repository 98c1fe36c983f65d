mod table;

pub use table::QTable;
