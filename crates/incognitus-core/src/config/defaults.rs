//! Default value functions used by serde for config deserialization.

pub fn default_data_dir() -> String {
    "~/.incognitus".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_backend_url() -> String {
    "https://lazez.uz".to_string()
}

pub fn default_i18n_url() -> String {
    "https://lazez.uz/miniapp/".to_string()
}

pub fn default_prefs_file() -> String {
    "~/.incognitus/prefs.json".to_string()
}

pub fn default_detect_timeout() -> u64 {
    10
}

pub fn default_platform() -> String {
    "unknown".to_string()
}
