//! Static site footer.

use leptos::prelude::*;

use crate::components::navbar::LOGO;

const FOOTER_SECTIONS: &[(&str, &[&str])] = &[
    ("About tripkolic", &["About us", "Newsroom", "tripkolic Blog", "Careers"]),
    (
        "Partnership",
        &[
            "Merchant sign up",
            "Merchant log in",
            "Affiliate Partnership",
            "Influencer Program",
            "Agent Marketplace",
            "tripkolic Partner Hub",
            "Distribution & Marketing Enquiries",
        ],
    ),
    (
        "Term of use",
        &["General terms of use", "Privacy policy", "Cookie policy", "Bug Bounty Program", "Animal Welfare Policy"],
    ),
];

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="site-footer">
            <div class="site-footer__brand">
                <img src=LOGO alt="Logo" class="site-footer__logo"/>
                <p>"Lorem ipsum odor amet, consectetuer adipiscing elit."</p>
                <p>"Gravida elit diam hendrerit dapibus diam velit non habitant potenti?"</p>
            </div>
            <div class="site-footer__sections">
                {FOOTER_SECTIONS
                    .iter()
                    .map(|(title, links)| {
                        view! {
                            <div class="site-footer__section">
                                <h3>{*title}</h3>
                                <ul>
                                    {links
                                        .iter()
                                        .map(|link| view! { <li><a href="#">{*link}</a></li> })
                                        .collect_view()}
                                </ul>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
            <p class="site-footer__copyright">"© 2024 Tripkolic. All rights reserved."</p>
        </footer>
    }
}
