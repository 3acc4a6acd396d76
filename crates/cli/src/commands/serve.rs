//! `careerpath serve` — Start the HTTP API server.

pub async fn run(
    port_override: Option<u16>,
    host_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(host) = host_override {
        config.gateway.host = host;
    }

    if !config.has_api_key() {
        tracing::warn!("No API key configured; AI requests will fail until one is set");
    }

    println!("CareerPath API");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Provider:  {} ({})", config.provider, config.model);
    println!("   CORS:      {}", config.gateway.allowed_origins.join(", "));

    careerpath_gateway::start(config).await?;

    Ok(())
}
