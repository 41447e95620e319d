//! Build-time configuration for the API and the user pool, with an optional
//! runtime override. The runtime config is read from `window.GRAMMY_CONFIG`
//! (if present) so static deployments can change endpoints without
//! rebuilding. Configuration values are public; do not store secrets here.

/// Region used when neither the build environment nor the runtime config
/// provides one.
const DEFAULT_REGION: &str = "eu-central-1";

/// Frontend configuration derived from build-time environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub user_pool_id: String,
    pub user_pool_client_id: String,
    pub region: String,
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    pub fn load() -> Self {
        let api_base_url = option_env!("GRAMMY_API_URL").unwrap_or("");
        let user_pool_id = option_env!("GRAMMY_USER_POOL_ID").unwrap_or("");
        let user_pool_client_id = option_env!("GRAMMY_USER_POOL_CLIENT_ID").unwrap_or("");
        let region = option_env!("GRAMMY_REGION").unwrap_or(DEFAULT_REGION);

        let mut config = Self {
            api_base_url: api_base_url.to_string(),
            user_pool_id: user_pool_id.to_string(),
            user_pool_client_id: user_pool_client_id.to_string(),
            region: region.to_string(),
        };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }

    /// Endpoint of the user-pool API derived from the configured region.
    pub fn identity_endpoint(&self) -> String {
        format!("https://cognito-idp.{}.amazonaws.com/", self.region)
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    user_pool_id: Option<String>,
    user_pool_client_id: Option<String>,
    region: Option<String>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.user_pool_id {
        config.user_pool_id = value;
    }
    if let Some(value) = runtime.user_pool_client_id {
        config.user_pool_client_id = value;
    }
    if let Some(value) = runtime.region {
        config.region = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("GRAMMY_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        api_base_url: read_runtime_value(&object, "API_URL"),
        user_pool_id: read_runtime_value(&object, "USER_POOL_ID"),
        user_pool_client_id: read_runtime_value(&object, "USER_POOL_CLIENT_ID"),
        region: read_runtime_value(&object, "REGION"),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()?;
    normalize_runtime_value(&value)
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, RuntimeConfig, apply_runtime_overrides, normalize_runtime_value};

    fn base_config() -> AppConfig {
        AppConfig {
            api_base_url: "https://api.default".to_string(),
            user_pool_id: "eu-central-1_Default".to_string(),
            user_pool_client_id: "default-client".to_string(),
            region: "eu-central-1".to_string(),
        }
    }

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value(""), None);
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  https://api.grammy.dev "),
            Some("https://api.grammy.dev".to_string())
        );
    }

    #[test]
    fn apply_runtime_overrides_ignores_empty_values() {
        let mut config = base_config();
        let runtime = RuntimeConfig {
            api_base_url: normalize_runtime_value(""),
            user_pool_id: normalize_runtime_value("  "),
            user_pool_client_id: normalize_runtime_value(""),
            region: normalize_runtime_value("  "),
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://api.default");
        assert_eq!(config.user_pool_id, "eu-central-1_Default");
        assert_eq!(config.user_pool_client_id, "default-client");
        assert_eq!(config.region, "eu-central-1");
    }

    #[test]
    fn apply_runtime_overrides_overwrites_when_present() {
        let mut config = base_config();
        let runtime = RuntimeConfig {
            api_base_url: normalize_runtime_value("https://api.override"),
            user_pool_id: normalize_runtime_value("eu-west-1_Override"),
            user_pool_client_id: normalize_runtime_value("override-client"),
            region: normalize_runtime_value("eu-west-1"),
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://api.override");
        assert_eq!(config.user_pool_id, "eu-west-1_Override");
        assert_eq!(config.user_pool_client_id, "override-client");
        assert_eq!(config.region, "eu-west-1");
    }

    #[test]
    fn identity_endpoint_follows_region() {
        let mut config = base_config();
        config.region = "us-east-1".to_string();
        assert_eq!(
            config.identity_endpoint(),
            "https://cognito-idp.us-east-1.amazonaws.com/"
        );
    }
}
