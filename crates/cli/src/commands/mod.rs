pub mod analyze;
pub mod chat;
pub mod doctor;
pub mod onboard;
pub mod serve;

use careerpath_config::AppConfig;

/// Load config or explain why it could not be loaded.
pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Fail early with setup instructions when no API key is available.
pub(crate) fn require_api_key(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.has_api_key() {
        return Ok(());
    }
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    CAREERPATH_API_KEY=...   (generic)");
    eprintln!("    GEMINI_API_KEY=...       (Google Gemini)");
    eprintln!("    OPENAI_API_KEY=...       (OpenAI-compatible providers)");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
    Err("No API key found. See above for setup instructions.".into())
}
