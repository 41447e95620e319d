//! Alert banners for blocking notices. Messages must be safe to render and
//! must never include secrets, codes, or tokens.

use leptos::prelude::*;

#[derive(Clone, Copy)]
/// Supported alert styles.
pub enum AlertKind {
    Error,
    Success,
    Info,
}

/// Renders a styled alert banner.
#[component]
pub fn Alert(kind: AlertKind, message: String) -> impl IntoView {
    let class = match kind {
        AlertKind::Error => {
            "rounded-lg border border-red-200 bg-red-50 px-4 py-3 text-sm text-red-700"
        }
        AlertKind::Success => {
            "rounded-lg border border-emerald-200 bg-emerald-50 px-4 py-3 text-sm text-emerald-700"
        }
        AlertKind::Info => {
            "rounded-lg border border-violet-200 bg-violet-50 px-4 py-3 text-sm text-violet-700"
        }
    };

    view! { <div class=class role="alert">{message}</div> }
}
