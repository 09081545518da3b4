//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Site chrome shared by every page. The navbar reads the session and profile
//! services from Leptos context; the footer is static.

pub mod footer;
pub mod navbar;
