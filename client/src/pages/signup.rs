//! Signup page: creates the account, requests the verification email, and
//! writes the initial profile document.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::account;
use crate::pages::login::SERVICE_UNAVAILABLE;
use crate::state::profile::{COUNTRIES, SignupForm};
use crate::state::session::{Notice, ServicesHandle};
use crate::util::auth::LOGIN_PATH;

const VERIFICATION_SENT: &str =
    "Your account was created. We sent you a verification email; please verify your address before logging in.";

#[component]
pub fn SignupPage() -> impl IntoView {
    let services = expect_context::<ServicesHandle>();
    let notice = expect_context::<Notice>();
    let navigate = use_navigate();

    let form = RwSignal::new(SignupForm::default());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = {
        let navigate = navigate.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if busy.get() {
                return;
            }
            error.set(None);
            let draft = form.get();
            if let Err(e) = draft.validate() {
                error.set(Some(e.to_string()));
                return;
            }
            let Some(services) = services.get_value() else {
                error.set(Some(SERVICE_UNAVAILABLE.to_owned()));
                return;
            };
            busy.set(true);

            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let now = time::OffsetDateTime::now_utc();
                match account::create_account(services.identity.as_ref(), services.documents.as_ref(), &draft, now).await
                {
                    Ok(user) => {
                        log::info!("signup: created account {}", user.id);
                        notice.0.set(Some(VERIFICATION_SENT.to_owned()));
                        navigate(LOGIN_PATH, NavigateOptions::default());
                    }
                    Err(e) => {
                        log::warn!("signup: {e}");
                        error.set(Some(e.to_string()));
                    }
                }
                busy.set(false);
            });
        }
    };

    let text_field = move |label: &'static str,
                          kind: &'static str,
                          get: fn(&SignupForm) -> String,
                          set: fn(&mut SignupForm, String)| {
        view! {
            <label class="login-label">
                {label}
                <input
                    class="login-input"
                    type=kind
                    prop:value=move || form.with(get)
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                />
            </label>
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card login-card--wide">
                <h1>"Sign Up"</h1>
                <form class="login-form" on:submit=on_submit>
                    {text_field("First Name", "text", |f| f.first_name.clone(), |f, v| f.first_name = v)}
                    {text_field("Last Name", "text", |f| f.last_name.clone(), |f, v| f.last_name = v)}
                    <label class="login-label">
                        "Country"
                        <select
                            class="login-input"
                            prop:value=move || form.read().country.clone()
                            on:change=move |ev| form.update(|f| f.country = event_target_value(&ev))
                        >
                            <option value="">"Select a country"</option>
                            {COUNTRIES
                                .iter()
                                .map(|country| view! { <option value=*country>{*country}</option> })
                                .collect_view()}
                        </select>
                    </label>
                    {text_field("Date of Birth", "date", |f| f.date_of_birth.clone(), |f, v| f.date_of_birth = v)}
                    {text_field("Phone (optional)", "tel", |f| f.phone.clone(), |f, v| f.phone = v)}
                    {text_field("Email", "email", |f| f.email.clone(), |f, v| f.email = v)}
                    {text_field("Password", "password", |f| f.password.clone(), |f, v| f.password = v)}
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Sign Up" }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="login-message login-message--error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">"Already have an account?"</p>
                <button
                    class="login-button login-button--secondary"
                    type="button"
                    on:click=move |_| navigate(LOGIN_PATH, NavigateOptions::default())
                >
                    "Log In"
                </button>
            </div>
        </div>
    }
}
