/// Build-time configuration for the rating API
use uuid::Uuid;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Identity sent in `X-User-ID` until real accounts exist
pub const DEFAULT_USER_ID: Uuid = Uuid::from_u128(0x123e4567_e89b_12d3_a456_426614174000);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub user_id: Uuid,
}

impl Config {
    pub fn new(api_base: &str, user_id: Uuid) -> Config {
        Config {
            api_base: api_base.trim_end_matches('/').to_string(),
            user_id,
        }
    }

    /// Read `WEB_ANNOTATOR_API_BASE` / `WEB_ANNOTATOR_USER_ID` baked in at compile time.
    ///
    /// The extension has no process environment at runtime, so overrides
    /// are resolved by `option_env!` when the wasm module is built.
    pub fn from_env() -> Config {
        Self::from_values(
            option_env!("WEB_ANNOTATOR_API_BASE"),
            option_env!("WEB_ANNOTATOR_USER_ID"),
        )
    }

    fn from_values(api_base: Option<&str>, user_id: Option<&str>) -> Config {
        let api_base = api_base
            .map(str::trim)
            .filter(|base| !base.is_empty())
            .unwrap_or(DEFAULT_API_BASE);

        let user_id = match user_id.map(Uuid::parse_str) {
            Some(Ok(id)) => id,
            Some(Err(e)) => {
                log::warn!("Ignoring invalid WEB_ANNOTATOR_USER_ID: {}", e);
                DEFAULT_USER_ID
            }
            None => DEFAULT_USER_ID,
        };

        Config::new(api_base, user_id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_API_BASE, DEFAULT_USER_ID)
    }
}
