//! Full-pipeline site generation command.

use anyhow::Result;
use sitesmith_ai::{GeminiClient, Generator};
use sitesmith_static::{BuildError, SiteBuilder};

use crate::config::Settings;

/// Run the generation pipeline with resolved settings.
///
/// A missing master plan is logged and ends the run without an error status.
pub async fn run(settings: Settings, api_key: String) -> Result<()> {
    let client = match &settings.api_base {
        Some(base) => GeminiClient::with_base(api_key, base.as_str()),
        None => GeminiClient::new(api_key),
    };

    let generator = Generator::new(client, settings.generator);
    let builder = SiteBuilder::new(settings.build, generator)?;

    match builder.generate(&settings.prompt).await {
        Ok(result) => {
            tracing::info!(
                "Built {} sections with {} templates in {}ms",
                result.sections,
                result.templates,
                result.duration_ms
            );
            tracing::info!("Output: {}", result.output_dir.display());
            tracing::info!("Entry page: {}", result.index_path.display());
            Ok(())
        }
        Err(BuildError::PlanUnavailable) => {
            tracing::error!("Unable to generate master design plan, process aborted");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
