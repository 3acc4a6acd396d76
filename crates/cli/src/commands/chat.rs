//! `careerpath chat` — Send one chat message with optional history.

use std::path::PathBuf;

use careerpath_advisor::CareerAdvisor;
use careerpath_core::message::ConversationTurn;

pub async fn run(
    message: String,
    history: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let history: Vec<ConversationTurn> = match history {
        Some(path) => {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            serde_json::from_str(&contents)
                .map_err(|e| format!("Invalid history file {}: {e}", path.display()))?
        }
        None => Vec::new(),
    };

    let config = super::load_config()?;
    super::require_api_key(&config)?;

    let provider = careerpath_providers::build_from_config(&config);
    let advisor = CareerAdvisor::from_config(provider, &config);

    let reply = advisor.chat(&message, &history).await?;
    println!("\n{reply}\n");

    Ok(())
}
