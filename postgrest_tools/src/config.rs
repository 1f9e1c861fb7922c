use log::*;
use order_common::Secret;

const DEFAULT_SCHEMA_PATH: &str = "/rest/v1";

#[derive(Debug, Clone, Default)]
pub struct PostgrestConfig {
    /// The project URL, e.g. `https://abcdefgh.supabase.co`
    pub url: String,
    pub api_key: Secret<String>,
    /// Path under `url` where the REST interface is mounted
    pub schema_path: String,
}

impl PostgrestConfig {
    pub fn new<S: Into<String>>(url: S, api_key: S) -> Self {
        Self { url: url.into(), api_key: Secret::new(api_key.into()), schema_path: DEFAULT_SCHEMA_PATH.to_string() }
    }

    pub fn new_from_env_or_default() -> Self {
        let url = std::env::var("ORD_POSTGREST_URL").unwrap_or_else(|_| {
            warn!("🪛️ ORD_POSTGREST_URL not set, using (probably useless) default");
            "http://localhost:3000".to_string()
        });
        let api_key = Secret::new(std::env::var("ORD_POSTGREST_API_KEY").unwrap_or_else(|_| {
            warn!("🪛️ ORD_POSTGREST_API_KEY not set, using (probably useless) default");
            String::default()
        }));
        let schema_path = std::env::var("ORD_POSTGREST_SCHEMA_PATH").unwrap_or_else(|_| DEFAULT_SCHEMA_PATH.to_string());
        Self { url, api_key, schema_path }
    }
}
