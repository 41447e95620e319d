//! Authenticator enrollment value. The pool hands the client a base32
//! shared secret during TOTP setup; the scannable `otpauth://` URI is
//! derived here, directly from that secret and the account email, so the
//! flow never depends on a provider-side helper to render it.

use url::form_urlencoded;

/// Issuer label shown by authenticator apps.
pub(crate) const ISSUER: &str = "Grammy";

/// Builds the `otpauth://totp/...` provisioning URI for a shared secret and
/// account. Deterministic: the same inputs always produce the same URI.
pub(crate) fn setup_uri(shared_secret: &str, account: &str) -> String {
    let label: String =
        form_urlencoded::byte_serialize(format!("{ISSUER}:{account}").as_bytes()).collect();
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("secret", shared_secret)
        .append_pair("issuer", ISSUER)
        .finish();
    format!("otpauth://totp/{label}?{query}")
}

/// Recovers the shared secret from a provisioning URI. Used by tests and by
/// the manual-entry fallback on the enrollment screen.
pub(crate) fn secret_from_uri(uri: &str) -> Option<String> {
    let parsed = url::Url::parse(uri).ok()?;
    if parsed.scheme() != "otpauth" {
        return None;
    }
    parsed
        .query_pairs()
        .find(|(key, _)| key == "secret")
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::{secret_from_uri, setup_uri};

    #[test]
    fn uri_encodes_secret_and_account() {
        let uri = setup_uri("JBSWY3DPEHPK3PXP", "a@b.com");
        assert!(uri.starts_with("otpauth://totp/Grammy%3Aa%40b.com?"));
        assert!(uri.contains("secret=JBSWY3DPEHPK3PXP"));
        assert!(uri.contains("issuer=Grammy"));
    }

    #[test]
    fn secret_round_trips_through_the_uri() {
        let secret = "GEZDGNBVGY3TQOJQ";
        let uri = setup_uri(secret, "singer@grammy.dev");
        assert_eq!(secret_from_uri(&uri).as_deref(), Some(secret));
    }

    #[test]
    fn derivation_is_deterministic() {
        let first = setup_uri("JBSWY3DPEHPK3PXP", "a@b.com");
        let second = setup_uri("JBSWY3DPEHPK3PXP", "a@b.com");
        assert_eq!(first, second);
    }

    #[test]
    fn non_otpauth_uris_are_rejected() {
        assert_eq!(secret_from_uri("https://example.com/?secret=X"), None);
        assert_eq!(secret_from_uri("not a uri"), None);
    }
}
