//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use platform::PlatformConfig;

use crate::pages::{home::HomePage, login::LoginPage, signup::SignupPage};
use crate::state::session::{Notice, ServicesHandle, SessionState};
use crate::util::bootstrap::{PLATFORM_CONFIG_ELEMENT_ID, embed_config};

/// HTML shell rendered on the server for SSR + hydration.
///
/// `config` is embedded as JSON so the hydrated client can reach the hosted
/// platform without a second round trip.
pub fn shell(options: LeptosOptions, config: Option<PlatformConfig>) -> impl IntoView {
    let embedded = config.as_ref().map(embed_config).unwrap_or_default();
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <script id=PLATFORM_CONFIG_ELEMENT_ID type="application/json" inner_html=embedded></script>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session signal, the platform services, and the cross-page
/// notice, then sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(SessionState::default());
    let services: ServicesHandle = StoredValue::new_local(None);
    let notice = Notice(RwSignal::new(None));

    provide_context(session);
    provide_context(services);
    provide_context(notice);

    #[cfg(feature = "hydrate")]
    crate::util::bootstrap::connect_services(session, services);

    on_cleanup(move || {
        let _ = services.try_with_value(|s| {
            if let Some(s) = s {
                s.teardown();
            }
        });
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/tripkolic.css"/>
        <Title text="Tripkolic"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("signup") view=SignupPage/>
                <Route path=StaticSegment("") view=HomePage/>
            </Routes>
        </Router>
    }
}
