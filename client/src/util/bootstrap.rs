//! Browser wiring for the hosted platform.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server embeds [`PlatformConfig`] as JSON in the SSR shell. On hydrate
//! the client reads it back, builds the hosted services, and starts the
//! one-time session restore.

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod bootstrap_test;

use platform::PlatformConfig;

#[cfg(feature = "hydrate")]
use crate::state::{
    profile::PendingImage,
    session::{SessionState, ServicesHandle},
};

/// DOM id of the `<script type="application/json">` carrying the config.
pub const PLATFORM_CONFIG_ELEMENT_ID: &str = "platform-config";

/// Serialize `config` for embedding inside a `<script>` element.
pub fn embed_config(config: &PlatformConfig) -> String {
    match serde_json::to_string(config) {
        // A literal `</` would close the script element early.
        Ok(raw) => raw.replace("</", "<\\/"),
        Err(e) => {
            log::error!("platform: failed to serialize config: {e}");
            String::new()
        }
    }
}

/// Parse the embedded config. Blank or malformed content yields `None`.
pub fn parse_embedded_config(raw: &str) -> Option<PlatformConfig> {
    if raw.trim().is_empty() {
        return None;
    }
    match PlatformConfig::from_json(raw) {
        Ok(config) => Some(config),
        Err(e) => {
            log::error!("platform: {e}");
            None
        }
    }
}

/// Read the config the server embedded in the page.
pub fn read_platform_config() -> Option<PlatformConfig> {
    #[cfg(feature = "hydrate")]
    {
        let document = web_sys::window()?.document()?;
        let raw = document.get_element_by_id(PLATFORM_CONFIG_ELEMENT_ID)?.text_content()?;
        parse_embedded_config(&raw)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Build the hosted services, store them in `handle`, and kick off session
/// restore. Without a config the session settles as signed out so guards
/// still resolve.
#[cfg(feature = "hydrate")]
pub fn connect_services(session: leptos::prelude::RwSignal<SessionState>, handle: ServicesHandle) {
    use std::rc::Rc;

    use leptos::prelude::*;
    use platform::HostedPlatform;

    use crate::state::session::Services;
    use crate::util::persistence::BrowserCredentialStore;

    let Some(config) = read_platform_config() else {
        log::error!("platform: no config embedded in page; running signed out");
        session.set(SessionState { user: None, loading: false });
        return;
    };
    let hosted = HostedPlatform::new(config, Rc::new(BrowserCredentialStore));
    let identity = hosted.identity();
    let services = Services::connect(identity.clone(), hosted.documents(), hosted.blobs(), move |state| {
        session.set(state);
    });
    handle.set_value(Some(services));
    leptos::task::spawn_local(async move {
        identity.restore().await;
    });
}

/// Read a picked file into memory for upload.
#[cfg(feature = "hydrate")]
pub async fn read_image(file: web_sys::File) -> Result<PendingImage, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("could not read {}: {e:?}", file.name()))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    let content_type = match file.type_() {
        t if t.is_empty() => "application/octet-stream".to_owned(),
        t => t,
    };
    Ok(PendingImage { content_type, bytes })
}
