use std::{collections::HashMap, fs};

/// Static platform configuration surfaced by the header and wallet views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub platform_name: String,
    pub token_symbol: String,
    pub logo_url: String,
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            platform_name: "Agora".into(),
            token_symbol: "AGORA".into(),
            logo_url: "/logo.svg".into(),
            api_url: "http://127.0.0.1:8080".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("client.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_overrides(&mut settings, |key| file_cfg.get(key).cloned());
        }
    }

    apply_overrides(&mut settings, |key| {
        std::env::var(format!("AGORA__{}", key.to_ascii_uppercase())).ok()
    });

    settings
}

fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("platform_name") {
        settings.platform_name = v;
    }
    if let Some(v) = lookup("token_symbol") {
        settings.token_symbol = v;
    }
    if let Some(v) = lookup("logo_url") {
        settings.logo_url = v;
    }
    if let Some(v) = lookup("api_url") {
        settings.api_url = v;
    }
}
