pub mod prompts;
pub mod spinner;
pub mod table;

pub use spinner::{Spinner, with_spinner};
