pub mod handle_classification;
pub mod run_once;

pub use handle_classification::*;
pub use run_once::*;
