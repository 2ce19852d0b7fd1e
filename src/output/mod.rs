//! Output module for everything printed on stdout
//!
//! This module handles:
//! - Rendering the SwiftBar menu
//! - Plain-text reports for terminal commands

mod menu;
mod report;

pub use menu::{format_error_menu, format_menu, format_title, MenuContext};
pub use report::{format_add_outcome, format_package_list, format_refresh_report};
