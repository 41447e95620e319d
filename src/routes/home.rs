//! Protected landing page: greets the signed-in user and exposes the demo
//! buttons that call the two backend endpoints with a bearer token.

use crate::components::{Alert, AlertKind, AppShell, Button, Spinner};
use crate::features::api::client as backend;
use crate::features::auth::state::{use_auth, use_auth_client};
use crate::features::auth::RequireAuth;
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <AppShell>
            <RequireAuth>
                <HomeContent />
            </RequireAuth>
        </AppShell>
    }
}

#[component]
fn HomeContent() -> impl IntoView {
    let auth = use_auth();
    let client = use_auth_client();

    let call_action = Action::new_local(move |endpoint: &String| {
        let client = client.clone();
        let endpoint = endpoint.clone();
        async move {
            backend::call_endpoint(&client, &endpoint)
                .await
                .map(|body| (endpoint, body))
        }
    });

    let health = LocalResource::new(|| async move { backend::health().await });

    view! {
        <div class="max-w-xl mx-auto space-y-8">
            <div>
                <h1 class="text-2xl font-semibold">"Home"</h1>
                <p class="mt-1 text-sm text-slate-500">
                    {move || {
                        auth.session
                            .get()
                            .map(|session| format!("Signed in as {}", session.email))
                    }}
                </p>
            </div>

            <div class="rounded-2xl border border-slate-200 bg-white p-6 space-y-4">
                <h2 class="text-lg font-medium">"API calls"</h2>
                <div class="flex gap-4">
                    <Button
                        disabled=call_action.pending()
                        on:click=move |_| {
                            call_action.dispatch("pawel".to_string());
                        }
                    >
                        "Call Pawel API"
                    </Button>
                    <Button
                        disabled=call_action.pending()
                        on:click=move |_| {
                            call_action.dispatch("kacper".to_string());
                        }
                    >
                        "Call Kacper API"
                    </Button>
                </div>

                {move || call_action.pending().get().then_some(view! { <Spinner /> })}
                {move || {
                    call_action
                        .value()
                        .get()
                        .map(|result| match result {
                            Ok((endpoint, body)) => {
                                view! {
                                    <pre class="rounded-lg bg-slate-900 text-slate-100 text-xs p-4 overflow-x-auto">
                                        {format!("{endpoint}:\n{body}")}
                                    </pre>
                                }
                                    .into_any()
                            }
                            Err(err) => {
                                view! { <Alert kind=AlertKind::Error message=err.to_string() /> }
                                    .into_any()
                            }
                        })
                }}
            </div>

            <p class="text-xs text-slate-400">
                "Backend status: "
                {move || match health.get() {
                    None => "checking…".to_string(),
                    Some(Ok(_)) => "online".to_string(),
                    Some(Err(_)) => "unreachable".to_string(),
                }}
            </p>
        </div>
    }
}
