//! Typed generation calls for each pipeline stage.

use std::time::Duration;

use serde_json::Value;

use crate::gateway::{AiGateway, ModelClient, ResponseFormat};
use crate::plan::MasterPlan;
use crate::prompts;

/// Default model identifier for both roles.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Stylesheet written when CSS generation fails.
pub const CSS_FALLBACK: &str = "/* AI failed to generate CSS. Please check logs. */";

/// Design document written when generation fails.
pub const DESIGN_DOC_FALLBACK: &str =
    "# Design Document Generation Failed\n\nAn error occurred during generation. Check logs.";

/// Models and timeouts for each kind of call.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model used for planning, design writing and template fixes
    pub primary_model: String,

    /// Lighter model used for templates and CSS
    pub light_model: String,

    pub plan_timeout: Duration,
    pub design_doc_timeout: Duration,
    pub template_timeout: Duration,
    pub css_timeout: Duration,
    pub fix_timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            primary_model: DEFAULT_MODEL.to_string(),
            light_model: DEFAULT_MODEL.to_string(),
            plan_timeout: Duration::from_secs(180),
            design_doc_timeout: Duration::from_secs(240),
            template_timeout: Duration::from_secs(120),
            css_timeout: Duration::from_secs(120),
            fix_timeout: Duration::from_secs(120),
        }
    }
}

/// Issues the model calls the site builder needs.
pub struct Generator {
    gateway: AiGateway,
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(client: impl ModelClient + 'static, config: GeneratorConfig) -> Self {
        Self {
            gateway: AiGateway::new(client),
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate and parse the master plan. `None` if the call or the parse fails.
    pub async fn generate_master_plan(&self, topic: &str) -> Option<MasterPlan> {
        tracing::info!("Generating master design plan for '{}'", topic);

        let text = self
            .gateway
            .call(
                &self.config.primary_model,
                &prompts::master_plan(topic),
                Some(ResponseFormat::Json),
                self.config.plan_timeout,
            )
            .await?;

        match MasterPlan::parse(&text) {
            Ok(plan) => {
                tracing::info!(
                    sections = plan.sections.len(),
                    "Master design plan generated and parsed"
                );
                Some(plan)
            }
            Err(e) => {
                tracing::error!(error = %e, raw = %text, "Failed to parse master plan");
                None
            }
        }
    }

    /// Generate the HTML template for one section type.
    pub async fn generate_template(&self, section_type: &str, example: &Value) -> Option<String> {
        tracing::info!("Generating HTML template for '{}'", section_type);

        let html = self
            .gateway
            .call(
                &self.config.light_model,
                &prompts::section_template(section_type, example),
                None,
                self.config.template_timeout,
            )
            .await;

        if html.is_some() {
            tracing::info!("HTML template for '{}' generated", section_type);
        }
        html
    }

    /// Generate the stylesheet, falling back to a placeholder comment.
    pub async fn generate_css(&self, plan: &MasterPlan, design_specs: &str) -> String {
        tracing::info!("Generating CSS from theme and design specs");

        match self
            .gateway
            .call(
                &self.config.light_model,
                &prompts::stylesheet(plan, design_specs),
                None,
                self.config.css_timeout,
            )
            .await
        {
            Some(css) => {
                tracing::info!("CSS generated");
                css
            }
            None => CSS_FALLBACK.to_string(),
        }
    }

    /// Write the Markdown design document, falling back to a placeholder.
    pub async fn write_design_doc(&self, plan: &MasterPlan) -> String {
        tracing::info!("Writing design document");

        match self
            .gateway
            .call(
                &self.config.primary_model,
                &prompts::design_document(plan),
                None,
                self.config.design_doc_timeout,
            )
            .await
        {
            Some(doc) => {
                tracing::info!("Design document generated");
                doc
            }
            None => DESIGN_DOC_FALLBACK.to_string(),
        }
    }

    /// Ask the model to repair a broken template.
    pub async fn fix_template(
        &self,
        broken_html: &str,
        error_message: &str,
        section_type: &str,
    ) -> Option<String> {
        tracing::info!(error = error_message, "Attempting to fix template for '{}'", section_type);

        let fixed = self
            .gateway
            .call(
                &self.config.primary_model,
                &prompts::fix_template(broken_html, error_message, section_type),
                None,
                self.config.fix_timeout,
            )
            .await;

        match &fixed {
            Some(_) => tracing::info!("Template for '{}' corrected", section_type),
            None => tracing::warn!("No correction returned for '{}'", section_type),
        }
        fixed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::gateway::{AiError, GenerateRequest};

    /// Replies with a fixed body and records what was asked.
    struct Recorder {
        reply: Option<&'static str>,
        seen: Mutex<Vec<(String, Option<ResponseFormat>, Duration)>>,
    }

    impl Recorder {
        fn replying(reply: Option<&'static str>) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelClient for std::sync::Arc<Recorder> {
        async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, AiError> {
            self.seen.lock().unwrap().push((
                request.model.to_string(),
                request.format,
                request.timeout,
            ));
            self.reply.map(str::to_string).ok_or(AiError::Empty)
        }
    }

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            primary_model: "pro".into(),
            light_model: "flash".into(),
            ..Default::default()
        }
    }

    fn plan() -> MasterPlan {
        MasterPlan::parse(r#"{"site_title": "T", "sections": [{"type": "hero", "content": {}}]}"#)
            .unwrap()
    }

    #[tokio::test]
    async fn master_plan_uses_primary_model_and_json_hint() {
        let recorder = std::sync::Arc::new(Recorder::replying(Some(
            "```json\n{\"site_title\": \"T\", \"sections\": [],}\n```",
        )));
        let generator = Generator::new(recorder.clone(), config());

        let plan = generator.generate_master_plan("cats").await.unwrap();

        assert_eq!(plan.site_title, "T");
        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen[0].0, "pro");
        assert_eq!(seen[0].1, Some(ResponseFormat::Json));
        assert_eq!(seen[0].2, Duration::from_secs(180));
    }

    #[tokio::test]
    async fn unparseable_plan_is_absent() {
        let recorder = std::sync::Arc::new(Recorder::replying(Some("I cannot do that.")));
        let generator = Generator::new(recorder, config());

        assert!(generator.generate_master_plan("cats").await.is_none());
    }

    #[tokio::test]
    async fn template_uses_light_model() {
        let recorder = std::sync::Arc::new(Recorder::replying(Some("<section></section>")));
        let generator = Generator::new(recorder.clone(), config());

        let html = generator.generate_template("hero", &json!({})).await;

        assert_eq!(html.as_deref(), Some("<section></section>"));
        assert_eq!(recorder.seen.lock().unwrap()[0].0, "flash");
    }

    #[tokio::test]
    async fn css_falls_back_to_placeholder() {
        let recorder = std::sync::Arc::new(Recorder::replying(None));
        let generator = Generator::new(recorder, config());

        assert_eq!(generator.generate_css(&plan(), "").await, CSS_FALLBACK);
    }

    #[tokio::test]
    async fn design_doc_falls_back_to_placeholder() {
        let recorder = std::sync::Arc::new(Recorder::replying(None));
        let generator = Generator::new(recorder.clone(), config());

        let doc = generator.write_design_doc(&plan()).await;

        assert!(doc.starts_with("# Design Document Generation Failed"));
        assert_eq!(recorder.seen.lock().unwrap()[0].2, Duration::from_secs(240));
    }

    #[tokio::test]
    async fn fix_uses_primary_model() {
        let recorder = std::sync::Arc::new(Recorder::replying(Some("<section>ok</section>")));
        let generator = Generator::new(recorder.clone(), config());

        let fixed = generator.fix_template("<section>", "boom", "hero").await;

        assert_eq!(fixed.as_deref(), Some("<section>ok</section>"));
        assert_eq!(recorder.seen.lock().unwrap()[0].0, "pro");
    }
}
