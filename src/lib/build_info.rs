/// Short git revision baked in by `build.rs`, shown in the page footer.
pub(crate) const GIT_SHA: &str = env!("GRAMMY_WEB_GIT_SHA");
