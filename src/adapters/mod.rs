//! Concrete adapter implementations for ports, plus chart rendering.

pub mod chart_svg;
pub mod chart_text;
pub mod csv_adapter;
pub mod file_config_adapter;
#[cfg(feature = "web")]
pub mod web;
