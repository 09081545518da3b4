//! Top navigation bar with the signed-in user's avatar and a logout menu.
//!
//! SYSTEM CONTEXT
//! ==============
//! The avatar comes from the `profileImage` field of the user's profile
//! document and falls back to a stock icon. Logout goes through the session
//! context; the signed-out notification then drives the page redirect.

use leptos::prelude::*;

use crate::net::account;
use crate::state::session::{ServicesHandle, SessionState};

pub const LOGO: &str = "/images/logo-large.svg";
pub const DEFAULT_USER_ICON: &str = "/images/icons/user.svg";
const CART_ICON: &str = "/images/icons/cart.svg";

#[component]
pub fn Navbar() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let services = expect_context::<ServicesHandle>();

    let user_icon = RwSignal::new(None::<String>);
    let dropdown_open = RwSignal::new(false);
    let logout_error = RwSignal::new(None::<String>);

    Effect::new(move || {
        let Some(user) = session.with(|s| s.user.clone()) else {
            user_icon.set(None);
            return;
        };
        let Some(services) = services.get_value() else {
            return;
        };
        leptos::task::spawn_local(async move {
            match account::load_profile(services.documents.as_ref(), &user.id).await {
                Ok(profile) => user_icon.set(profile.and_then(|p| p.profile_image)),
                Err(e) => log::warn!("navbar: could not load avatar: {e}"),
            }
        });
    });

    let on_logout = move |_: leptos::ev::MouseEvent| {
        let Some(services) = services.get_value() else {
            return;
        };
        logout_error.set(None);
        leptos::task::spawn_local(async move {
            match account::sign_out(&services.session).await {
                Ok(()) => dropdown_open.set(false),
                Err(e) => {
                    log::error!("navbar: logout failed: {e}");
                    logout_error.set(Some(e.to_string()));
                }
            }
        });
    };

    view! {
        <nav class="navbar">
            <div class="navbar__brand">
                <img src=LOGO alt="Logo" width="100" height="100"/>
            </div>
            <div class="navbar__links">
                <button class="navbar__link">"Home"</button>
                <button class="navbar__link">"Tours"</button>
            </div>
            <div class="navbar__actions">
                <img src=CART_ICON alt="Cart" width="30" height="30" class="navbar__icon"/>
                <div class="navbar__user">
                    <img
                        src=move || user_icon.get().unwrap_or_else(|| DEFAULT_USER_ICON.to_owned())
                        alt="User"
                        width="30"
                        height="30"
                        class="navbar__icon"
                        on:click=move |_| dropdown_open.update(|open| *open = !*open)
                    />
                    <Show when=move || dropdown_open.get()>
                        <div class="navbar__dropdown">
                            <button class="navbar__dropdown-item" on:click=on_logout>
                                "Logout"
                            </button>
                            <Show when=move || logout_error.get().is_some()>
                                <p class="navbar__dropdown-error">{move || logout_error.get().unwrap_or_default()}</p>
                            </Show>
                        </div>
                    </Show>
                </div>
            </div>
        </nav>
    }
}
