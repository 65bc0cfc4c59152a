use log::{info, warn};

/// Environment variable lookup - tries runtime first, then build-time embedded fallbacks
pub fn get_env_var(key: &str) -> Option<String> {
    // Load .env file if it exists for development
    let _ = dotenvy::dotenv();

    if let Ok(value) = std::env::var(key) {
        if !value.is_empty() {
            return Some(value);
        }
    }

    // option_env!() instead of env!() so a build without the variable still compiles
    let embedded_value = match key {
        "GEMINI_API_KEY" => option_env!("GEMINI_API_KEY"),
        "GEMINI_MODEL" => option_env!("GEMINI_MODEL"),
        "PREPMATE_AUTH_API_URL" => option_env!("PREPMATE_AUTH_API_URL"),
        _ => None,
    };

    embedded_value
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// `abcd...wxyz` style preview so keys never hit the log in full.
pub fn key_preview(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    }
}

pub fn log_environment_status() {
    info!("🔧 Environment Configuration Status (runtime + embedded fallback):");

    match get_env_var("GEMINI_API_KEY") {
        Some(key) => info!("✅ GEMINI_API_KEY: {} (length: {})", key_preview(&key), key.len()),
        None => warn!("❌ GEMINI_API_KEY: Not available (neither runtime nor embedded)"),
    }

    match get_env_var("PREPMATE_AUTH_API_URL") {
        Some(url) => info!("✅ PREPMATE_AUTH_API_URL: {}", url),
        None => info!("ℹ️ PREPMATE_AUTH_API_URL: not set, using configured default"),
    }
}
