use crate::app_lib::config::AppConfig;
use crate::features::auth::client::CognitoClient;
use crate::features::auth::state::AuthProvider;
use crate::routes::AppRoutes;
use leptos::prelude::*;
use leptos_router::components::Router;

#[component]
pub fn App() -> impl IntoView {
    // Single explicitly constructed user-pool client, injected everywhere.
    let config = AppConfig::load();
    provide_context(CognitoClient::new(&config));

    view! {
        <AuthProvider>
            <Router>
                <AppRoutes />
            </Router>
        </AuthProvider>
    }
}
