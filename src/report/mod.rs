mod brick_table;

pub use brick_table::BrickReport;
