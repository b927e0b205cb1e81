pub mod external_tools;
pub mod logging;
pub(crate) mod progress_bar_builder;
