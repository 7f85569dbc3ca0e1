pub mod filters;
pub mod logging;
