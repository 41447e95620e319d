//! Calls against the Grammy backend. Protected endpoints require a bearer
//! token fetched from the auth client right before each request.

pub(crate) mod client;
