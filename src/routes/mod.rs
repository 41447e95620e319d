mod home;
mod login;
mod not_found;

pub(crate) use home::HomePage;
pub(crate) use login::LoginPage;
pub(crate) use not_found::NotFoundPage;

use leptos::prelude::*;
use leptos_router::components::{Route, Routes};
use leptos_router::path;

/// Route paths shared by guards and navigation.
pub(crate) mod paths {
    pub(crate) const HOME: &str = "/";
    pub(crate) const LOGIN: &str = "/login";
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes fallback=|| view! { <NotFoundPage /> }>
            <Route path=path!("/") view=HomePage />
            <Route path=path!("/login") view=LoginPage />
            <Route path=path!("/*any") view=NotFoundPage />
        </Routes>
    }
}
