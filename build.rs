use std::env;
use std::path::Path;

const EMBEDDED_KEYS: &[&str] = &["GEMINI_API_KEY", "GEMINI_MODEL", "PREPMATE_AUTH_API_URL"];

fn main() {
    // Load .env file during build for environment variables
    if let Err(e) = dotenvy::dotenv() {
        println!("cargo:warning=BUILD.RS: Failed to load .env file: {}. Using system environment variables.", e);
    }

    // Also try the parent directory .env (for a checkout nested under the web app)
    let parent_env = Path::new("../.env");
    if parent_env.exists() {
        if let Err(e) = dotenvy::from_path(parent_env) {
            println!("cargo:warning=BUILD.RS: Failed to parse ../.env: {}", e);
        }
    }

    // Export environment variables to be available at runtime using cargo:rustc-env.
    // Runtime env::var() still wins over these, see src/env.rs
    for key in EMBEDDED_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
        match env::var(key) {
            Ok(value) if !value.is_empty() => {
                println!("cargo:rustc-env={}={}", key, value);
                println!("cargo:warning=Embedded {} (length: {})", key, value.len());
            }
            _ => {}
        }
    }

    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-changed=build.rs");
}
