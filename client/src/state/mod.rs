//! Client state shared through Leptos context.

pub mod profile;
pub mod session;
