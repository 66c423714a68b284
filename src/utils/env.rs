use std::env;

/// Read an environment variable, treating empty values as unset
pub fn lookup_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

/// Parse a boolean flag value. Unknown values are false.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Load a `.env` file if present
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(_) => tracing::info!("No .env file found, using system environment variables"),
    }
}
