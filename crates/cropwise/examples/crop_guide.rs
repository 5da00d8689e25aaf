use cropwise::{AdvisorConfig, AdvisoryRequest, ConfigError, CropAdvisor, fallback};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// # Crop Guide – end-to-end advisory
///
/// Loads an optional TOML config, builds the HTTP backend from it and prints
/// the advisory for every crop given on the command line as JSON. Set
/// `kind = "farming_guide"` under `[generation]` for the full farming guide.
///
/// Without a reachable API, or with the key variable unset, the answers
/// still arrive from the curated table or from defaults, flagged
/// `"success": false`.
///
/// ```bash
/// export GROQ_API_KEY=gsk_…                      # unset: offline answers only
/// export CROPWISE_CONFIG=./cropwise.toml         # optional
/// RUST_LOG=cropwise=debug cargo run -p cropwise --example crop_guide -- "Basmati Rice" Cotton
/// ```
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cropwise=info")),
        )
        .init();

    let config = match std::env::var("CROPWISE_CONFIG") {
        Ok(path) => AdvisorConfig::load(path)?,
        Err(_) => AdvisorConfig::default(),
    };
    let kind = config.generation.kind;

    let advisor = match config.api.build_adapter() {
        Ok(backend) => Some(CropAdvisor::with_config(backend, config.generation)),
        Err(ConfigError::MissingApiKey(var)) => {
            warn!(%var, "API key not set, answering offline");
            None
        }
        Err(error) => return Err(error.into()),
    };

    let mut crops: Vec<String> = std::env::args().skip(1).collect();
    if crops.is_empty() {
        crops.push("Wheat".into());
    }

    for crop in crops {
        let request = AdvisoryRequest::new(crop)?;
        let result = match &advisor {
            Some(advisor) => advisor.advise(&request).await,
            None => fallback(request.crop_name(), kind),
        };

        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
