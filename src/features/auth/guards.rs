//! Session gate for protected routes. The asynchronous session check is
//! the page's only suspension point: a spinner renders while it runs,
//! children render when a session exists, and everyone else is sent to the
//! login view with the originally requested path preserved.

use crate::components::Spinner;
use crate::features::auth::provider::IdentityProvider;
use crate::features::auth::state::{use_auth, use_auth_client};
use crate::routes::paths;
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let client = use_auth_client();
    let session_check = LocalResource::new(move || {
        let client = client.clone();
        async move { client.current_session().await.unwrap_or(None) }
    });

    let navigate = use_navigate();
    let location = use_location();
    Effect::new(move |_| match session_check.get() {
        Some(Some(session)) => auth.set_session(session),
        Some(None) => {
            // UX-only guard; real access control must live on the API.
            let from = location.pathname.get_untracked();
            navigate(
                &format!("{}?from={from}", paths::LOGIN),
                Default::default(),
            );
        }
        None => {}
    });

    view! {
        {move || match session_check.get() {
            Some(Some(_)) => children().into_any(),
            Some(None) => ().into_any(),
            None => view! {
                <div class="flex justify-center py-16">
                    <Spinner />
                </div>
            }
                .into_any(),
        }}
    }
}
