//! Minimal 404 page for unknown routes.

use crate::components::AppShell;
use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <AppShell>
            <div class="flex flex-col items-center justify-center min-h-[50vh] text-center gap-4">
                <h1 class="text-6xl font-black text-slate-200 select-none">"404"</h1>
                <p class="text-slate-500">"This page does not exist."</p>
                <A
                    href="/"
                    {..}
                    class="text-sm font-medium text-violet-700 underline underline-offset-4"
                >
                    "Go home"
                </A>
            </div>
        </AppShell>
    }
}
