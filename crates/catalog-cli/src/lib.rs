//! Terminal front-end components for the catalog browser.

pub mod browse;
pub mod catalog_file;
pub mod filters;
pub mod logging;
pub mod render;
pub mod settings;
