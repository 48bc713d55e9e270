use std::{collections::HashMap, fs, path::Path};

use emailjs_integration::EmailJsConfig;
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "support.toml";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub target_count: u32,
    pub notify_recipient: String,
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_public_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        let emailjs = EmailJsConfig::default();
        Self {
            target_count: 1,
            notify_recipient: "proposer@example.com".into(),
            emailjs_service_id: emailjs.service_id,
            emailjs_template_id: emailjs.template_id,
            emailjs_public_key: emailjs.public_key,
        }
    }
}

impl Settings {
    pub fn emailjs(&self) -> EmailJsConfig {
        EmailJsConfig {
            service_id: self.emailjs_service_id.clone(),
            template_id: self.emailjs_template_id.clone(),
            public_key: self.emailjs_public_key.clone(),
            ..EmailJsConfig::default()
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("target_count") {
                apply_target_count(&mut settings, v);
            }
            if let Some(v) = file_cfg.get("notify_recipient") {
                settings.notify_recipient = v.clone();
            }
            if let Some(v) = file_cfg.get("emailjs_service_id") {
                settings.emailjs_service_id = v.clone();
            }
            if let Some(v) = file_cfg.get("emailjs_template_id") {
                settings.emailjs_template_id = v.clone();
            }
            if let Some(v) = file_cfg.get("emailjs_public_key") {
                settings.emailjs_public_key = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("TARGET_COUNT") {
        apply_target_count(&mut settings, &v);
    }
    if let Ok(v) = std::env::var("APP__TARGET_COUNT") {
        apply_target_count(&mut settings, &v);
    }

    if let Ok(v) = std::env::var("NOTIFY_RECIPIENT") {
        settings.notify_recipient = v;
    }
    if let Ok(v) = std::env::var("APP__NOTIFY_RECIPIENT") {
        settings.notify_recipient = v;
    }

    if let Ok(v) = std::env::var("EMAILJS_SERVICE_ID") {
        settings.emailjs_service_id = v;
    }
    if let Ok(v) = std::env::var("APP__EMAILJS_SERVICE_ID") {
        settings.emailjs_service_id = v;
    }

    if let Ok(v) = std::env::var("EMAILJS_TEMPLATE_ID") {
        settings.emailjs_template_id = v;
    }
    if let Ok(v) = std::env::var("APP__EMAILJS_TEMPLATE_ID") {
        settings.emailjs_template_id = v;
    }

    if let Ok(v) = std::env::var("EMAILJS_PUBLIC_KEY") {
        settings.emailjs_public_key = v;
    }
    if let Ok(v) = std::env::var("APP__EMAILJS_PUBLIC_KEY") {
        settings.emailjs_public_key = v;
    }

    settings
}

// The target must stay >= 1; zero or unparsable values are ignored.
fn apply_target_count(settings: &mut Settings, raw: &str) {
    if let Ok(parsed) = raw.trim().parse::<u32>() {
        if parsed >= 1 {
            settings.target_count = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
