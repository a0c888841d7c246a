use serde::Deserialize;

/// Default Cosmic-compatible API endpoint, overridable for self-hosted
/// deployments and for pointing tests at a mock server.
const DEFAULT_STORE_BASE_URL: &str = "https://api.cosmicjs.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub store_base_url: String,
    pub store_bucket_slug: String,
    pub store_read_key: String,
    pub store_write_key: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            store_base_url: std::env::var("COSMIC_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("COSMIC_BASE_URL must start with http:// or https://");
                    }
                    Ok(url)
                })
                .transpose()?
                .unwrap_or_else(|| DEFAULT_STORE_BASE_URL.to_string()),
            store_bucket_slug: std::env::var("COSMIC_BUCKET_SLUG")
                .map_err(|_| anyhow::anyhow!("COSMIC_BUCKET_SLUG environment variable required"))
                .and_then(|slug| {
                    if slug.trim().is_empty() {
                        anyhow::bail!("COSMIC_BUCKET_SLUG cannot be empty");
                    }
                    Ok(slug)
                })?,
            store_read_key: std::env::var("COSMIC_READ_KEY")
                .map_err(|_| anyhow::anyhow!("COSMIC_READ_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("COSMIC_READ_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            store_write_key: std::env::var("COSMIC_WRITE_KEY")
                .map_err(|_| anyhow::anyhow!("COSMIC_WRITE_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("COSMIC_WRITE_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Store base URL: {}", config.store_base_url);
        tracing::debug!("Store bucket: {}", config.store_bucket_slug);
        tracing::debug!("Server port: {}", config.port);

        Ok(config)
    }
}
