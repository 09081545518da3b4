//! Login page: email + password sign-in for verified accounts.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::account;
use crate::state::session::{Notice, ServicesHandle, SessionState};
use crate::util::auth::install_verified_redirect;

/// Shown when the page runs without platform services.
pub(crate) const SERVICE_UNAVAILABLE: &str = "Sign-in is unavailable right now. Please try again later.";

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let services = expect_context::<ServicesHandle>();
    let notice = expect_context::<Notice>();
    let navigate = use_navigate();

    install_verified_redirect(session, navigate.clone());

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let info = RwSignal::new(notice.take());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        error.set(None);
        let Some(services) = services.get_value() else {
            error.set(Some(SERVICE_UNAVAILABLE.to_owned()));
            return;
        };
        let email_value = email.get();
        let password_value = password.get();
        busy.set(true);

        leptos::task::spawn_local(async move {
            // A verified sign-in moves the session and the redirect effect
            // takes over from here.
            if let Err(e) = account::sign_in(services.identity.as_ref(), &email_value, &password_value).await {
                log::info!("login: {e}");
                info.set(None);
                error.set(Some(e.to_string()));
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Log In"</h1>
                <Show when=move || info.get().is_some()>
                    <p class="login-message">{move || info.get().unwrap_or_default()}</p>
                </Show>
                <form class="login-form" on:submit=on_submit>
                    <label class="login-label" for="login-email">"Email"</label>
                    <input
                        id="login-email"
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <label class="login-label" for="login-password">"Password"</label>
                    <input
                        id="login-password"
                        class="login-input"
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Logging in..." } else { "Log In" }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="login-message login-message--error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">"Don't have an account?"</p>
                <button
                    class="login-button login-button--secondary"
                    type="button"
                    on:click=move |_| navigate("/signup", NavigateOptions::default())
                >
                    "Sign Up"
                </button>
            </div>
        </div>
    }
}
