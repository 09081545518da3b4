//! # client
//!
//! Leptos + WASM front-end for the Tripkolic customer portal: login, signup,
//! and the account home page with profile editing.
//!
//! Pages talk to the hosted platform through the `platform` crate's service
//! traits and read the signed-in user from a `session::SessionContext`
//! mirrored into a signal (see [`state::session`]).

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: set up console logging and hydrate the SSR markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
