//! Shared layout wrapper with the header and content container. It
//! centralizes the brand header and the sign-out control so routes can
//! focus on content. Navigation remains client-side; the backend enforces
//! real access control.

use crate::app_lib::build_info;
use crate::features::auth::provider::IdentityProvider;
use crate::features::auth::state::{use_auth, use_auth_client};
use crate::routes::paths;
use leptos::prelude::*;
use leptos_router::{components::A, hooks::use_navigate};

/// Wraps routes with a header and main content container.
#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let client = use_auth_client();
    let is_authenticated = auth.is_authenticated;

    let sign_out_action = Action::new_local(move |_: &()| {
        let client = client.clone();
        async move { client.sign_out().await }
    });

    let navigate = use_navigate();
    Effect::new(move |_| {
        if sign_out_action.value().get().is_some() {
            auth.clear_session();
            navigate(paths::LOGIN, Default::default());
        }
    });

    view! {
        <div class="min-h-screen flex flex-col bg-slate-50 text-slate-900">
            <header class="border-b border-slate-200 bg-white">
                <div class="max-w-screen-lg flex items-center justify-between mx-auto px-4 py-3">
                    <A href="/" {..} class="flex items-center gap-2">
                        <span class="text-xl">"🏆"</span>
                        <span class="font-semibold whitespace-nowrap">"Grammy"</span>
                    </A>
                    {move || {
                        is_authenticated
                            .get()
                            .then_some(
                                view! {
                                    <button
                                        type="button"
                                        class="text-sm font-medium text-slate-600 hover:text-slate-900 cursor-pointer"
                                        disabled=move || sign_out_action.pending().get()
                                        on:click=move |_| {
                                            sign_out_action.dispatch(());
                                        }
                                    >
                                        "Sign out"
                                    </button>
                                },
                            )
                    }}
                </div>
            </header>
            <main class="flex-1 max-w-screen-lg w-full mx-auto px-4 py-8">{children()}</main>
            <footer class="border-t border-slate-200 py-3">
                <p class="max-w-screen-lg mx-auto px-4 text-xs text-slate-400">
                    {format!("grammy-web {}", build_info::GIT_SHA)}
                </p>
            </footer>
        </div>
    }
}
