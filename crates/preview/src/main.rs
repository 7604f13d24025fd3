use anyhow::Context;
use chrono::Utc;

use souq_variants::EngineConfig;

fn main() -> anyhow::Result<()> {
    souq_observability::init();

    let path = std::env::args_os()
        .nth(1)
        .context("usage: souq-preview <draft.json>")?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.to_string_lossy()))?;
    let input = souq_preview::PreviewInput::from_json(&raw)?;

    let payload = souq_preview::run(&input, EngineConfig::from_env(), Utc::now())?;

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
