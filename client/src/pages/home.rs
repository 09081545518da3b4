//! Account home page: profile card, section tabs, and profile settings.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. It waits for the session to
//! settle, redirects signed-out visitors to `/login`, and otherwise loads the
//! `users/{uid}` document for display and editing.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::footer::Footer;
use crate::components::navbar::{DEFAULT_USER_ICON, Navbar};
use crate::net::account;
use crate::state::profile::{COUNTRIES, PendingImage, Profile, ProfileForm, or_not_available};
use crate::state::session::{ServicesHandle, SessionState};
use crate::util::auth::install_unauth_redirect;

/// Sections of the home page, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Personal,
    Bookings,
    Reviews,
    Settings,
    Notifications,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Personal, Tab::Bookings, Tab::Reviews, Tab::Settings, Tab::Notifications];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Personal => "Personal",
            Tab::Bookings => "Bookings",
            Tab::Reviews => "Reviews",
            Tab::Settings => "Settings",
            Tab::Notifications => "Notifications",
        }
    }
}

/// Labelled rows of the Personal tab. Missing values read "N/A".
pub fn personal_rows(profile: Option<&Profile>) -> Vec<(&'static str, String)> {
    let empty = Profile::default();
    let p = profile.unwrap_or(&empty);
    vec![
        ("Name", or_not_available(p.first_name.as_deref())),
        ("Surname", or_not_available(p.last_name.as_deref())),
        ("Country", or_not_available(p.country.as_deref())),
        ("Birthday", or_not_available(p.date_of_birth.as_deref())),
        ("Passport Number", or_not_available(p.passport_number.as_deref())),
        ("Phone Number", or_not_available(p.phone.as_deref())),
    ]
}

/// Rows of the (not yet populated) Passengers card.
fn passenger_rows() -> Vec<(&'static str, String)> {
    personal_rows(None)
}

/// Host statistics shown under the profile card.
const HOST_STATS: [(&str, &str); 3] = [("4.80", "Rating"), ("100", "Reviews"), ("4", "Years Hosting")];

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let services = expect_context::<ServicesHandle>();
    let navigate = use_navigate();

    install_unauth_redirect(session, navigate);

    let profile = RwSignal::new(None::<Profile>);
    let form = RwSignal::new(ProfileForm::default());
    let active_tab = RwSignal::new(Tab::Personal);
    let pending_image = RwSignal::new(None::<PendingImage>);
    let uploading = RwSignal::new(false);
    let message = RwSignal::new(None::<String>);

    // Reload the profile whenever the signed-in user changes.
    Effect::new(move || {
        let Some(user) = session.with(|s| s.user.clone()) else {
            profile.set(None);
            return;
        };
        let Some(services) = services.get_value() else {
            return;
        };
        leptos::task::spawn_local(async move {
            match account::load_profile(services.documents.as_ref(), &user.id).await {
                Ok(Some(loaded)) => {
                    form.set(ProfileForm::from(&loaded));
                    profile.set(Some(loaded));
                }
                Ok(None) => log::warn!("home: no profile document for {}", user.id),
                Err(e) => log::error!("home: failed to load profile: {e}"),
            }
        });
    });

    let on_save = move |_: leptos::ev::MouseEvent| {
        let Some(user) = session.with_untracked(|s| s.user.clone()) else {
            return;
        };
        let Some(services) = services.get_value() else {
            return;
        };
        let draft = form.get_untracked();
        message.set(None);
        leptos::task::spawn_local(async move {
            match account::save_profile(services.documents.as_ref(), &user.id, &draft).await {
                Ok(()) => {
                    profile.update(|p| draft.apply_to(p.get_or_insert_with(Profile::default)));
                    active_tab.set(Tab::Personal);
                }
                Err(e) => {
                    log::error!("home: failed to save profile: {e}");
                    message.set(Some(e.to_string()));
                }
            }
        });
    };

    let on_upload = move |_: leptos::ev::MouseEvent| {
        let Some(image) = pending_image.get_untracked() else {
            return;
        };
        let Some(user) = session.with_untracked(|s| s.user.clone()) else {
            return;
        };
        let Some(services) = services.get_value() else {
            return;
        };
        uploading.set(true);
        message.set(None);
        leptos::task::spawn_local(async move {
            match account::upload_profile_image(services.blobs.as_ref(), services.documents.as_ref(), &user.id, image)
                .await
            {
                Ok(url) => {
                    profile.update(|p| p.get_or_insert_with(Profile::default).profile_image = Some(url));
                    pending_image.set(None);
                }
                Err(e) => {
                    log::error!("home: failed to upload profile image: {e}");
                    message.set(Some(e.to_string()));
                }
            }
            uploading.set(false);
        });
    };

    let on_file_change = move |ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast;

            let file = ev
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            let Some(file) = file else {
                pending_image.set(None);
                return;
            };
            leptos::task::spawn_local(async move {
                match crate::util::bootstrap::read_image(file).await {
                    Ok(image) => pending_image.set(Some(image)),
                    Err(e) => log::error!("home: {e}"),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = ev;
        }
    };

    let settings_field = move |label: &'static str,
                               kind: &'static str,
                               get: fn(&ProfileForm) -> String,
                               set: fn(&mut ProfileForm, String)| {
        view! {
            <label class="settings-field">
                <span>{label}</span>
                <input
                    class="settings-input"
                    type=kind
                    prop:value=move || form.with(get)
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                />
            </label>
        }
    };

    let info_rows = |rows: Vec<(&'static str, String)>| {
        rows.into_iter()
            .map(|(label, value)| {
                view! {
                    <p class="info-row">
                        <strong>{label}": "</strong>
                        {value}
                    </p>
                }
            })
            .collect_view()
    };

    view! {
        <div class="home-page">
            <Navbar/>
            <main class="home-main">
                <Show when=move || uploading.get()>
                    <div class="busy-overlay">
                        <div class="busy-overlay__spinner"></div>
                    </div>
                </Show>
                <aside class="profile-card">
                    <Show when=move || profile.get().is_some()>
                        <div class="profile-card__identity">
                            <img
                                class="profile-card__avatar"
                                src=move || {
                                    profile
                                        .get()
                                        .and_then(|p| p.profile_image)
                                        .unwrap_or_else(|| DEFAULT_USER_ICON.to_owned())
                                }
                                alt="User avatar"
                                width="100"
                                height="100"
                            />
                            <p class="profile-card__name">
                                {move || profile.get().map(|p| p.display_name()).unwrap_or_default()}
                            </p>
                            <p class="profile-card__badge">"Super Host"</p>
                        </div>
                    </Show>
                    <div class="profile-card__stats">
                        {HOST_STATS
                            .iter()
                            .map(|(value, label)| {
                                view! {
                                    <div class="profile-card__stat">
                                        <p class="profile-card__stat-value">{*value}</p>
                                        <p class="profile-card__stat-label">{*label}</p>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                    <nav class="profile-tabs">
                        {Tab::ALL
                            .into_iter()
                            .map(|tab| {
                                view! {
                                    <button
                                        class=move || {
                                            if active_tab.get() == tab { "profile-tab profile-tab--active" } else { "profile-tab" }
                                        }
                                        on:click=move |_| active_tab.set(tab)
                                    >
                                        {tab.label()}
                                    </button>
                                }
                            })
                            .collect_view()}
                    </nav>
                </aside>
                <section class="home-content">
                    <Show when=move || message.get().is_some()>
                        <p class="home-message home-message--error">{move || message.get().unwrap_or_default()}</p>
                    </Show>
                    {move || match active_tab.get() {
                        Tab::Personal => {
                            view! {
                                <div class="info-card">
                                    <h2>"Information"</h2>
                                    {move || info_rows(personal_rows(profile.get().as_ref()))}
                                </div>
                                <div class="info-card">
                                    <h2>"Passengers"</h2>
                                    {info_rows(passenger_rows())}
                                </div>
                            }
                                .into_any()
                        }
                        Tab::Settings => {
                            view! {
                                <div class="settings-card">
                                    <h2>"Settings"</h2>
                                    {settings_field("First Name", "text", |f| f.first_name.clone(), |f, v| f.first_name = v)}
                                    {settings_field("Last Name", "text", |f| f.last_name.clone(), |f, v| f.last_name = v)}
                                    <label class="settings-field">
                                        <span>"Country"</span>
                                        <select
                                            class="settings-input"
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
                                    {settings_field("Date of Birth", "date", |f| f.date_of_birth.clone(), |f, v| f.date_of_birth = v)}
                                    {settings_field("Passport Number", "text", |f| f.passport_number.clone(), |f, v| f.passport_number = v)}
                                    {settings_field("Phone Number", "tel", |f| f.phone.clone(), |f, v| f.phone = v)}
                                    <label class="settings-field">
                                        <span>"Profile Image"</span>
                                        <input class="settings-input" type="file" accept="image/*" on:change=on_file_change/>
                                    </label>
                                    <Show when=move || pending_image.with(Option::is_some)>
                                        <button class="settings-button" type="button" on:click=on_upload>
                                            "Upload"
                                        </button>
                                    </Show>
                                    <button class="settings-button settings-button--primary" type="button" on:click=on_save>
                                        "Save Changes"
                                    </button>
                                </div>
                            }
                                .into_any()
                        }
                        tab => {
                            view! {
                                <div class="info-card">
                                    <h2>{tab.label()}</h2>
                                </div>
                            }
                                .into_any()
                        }
                    }}
                </section>
            </main>
            <Footer/>
        </div>
    }
}
