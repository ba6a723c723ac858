mod bar_file;

pub use bar_file::{BarValidationError, export_artifacts_json, load_bars_json, validate_bars};
