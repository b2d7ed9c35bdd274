//! Site builder.
//!
//! Runs the pipeline in order: master plan, design document, design specs,
//! stylesheet, section templates, section rendering and page assembly. Only a
//! missing master plan stops the run; every later failure degrades to a
//! placeholder so a complete output set is always written.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use sitesmith_ai::{Generator, MasterPlan};

use crate::assets::AssetPipeline;
use crate::design_spec::extract_design_specs;
use crate::templates::{render_page, template_file_name, FixPolicy, SectionRenderer};

/// Configuration for building a site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Output root, wiped when the builder is created
    pub output_dir: PathBuf,

    /// Directory for generated section templates (defaults to `<output>/templates`)
    pub templates_dir: Option<PathBuf>,

    /// Repair budget for failing templates
    pub fix_policy: FixPolicy,

    /// Minify the generated stylesheet
    pub minify_css: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output_website"),
            templates_dir: None,
            fix_policy: FixPolicy::default(),
            minify_css: false,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of sections rendered into the page
    pub sections: usize,

    /// Number of templates written
    pub templates: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,

    /// The site's entry page
    pub index_path: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Unable to generate master design plan")]
    PlanUnavailable,

    #[error("Failed to prepare output directory: {0}")]
    PrepareError(String),

    #[error("Failed to serialize master plan: {0}")]
    SerializeError(String),

    #[error("Failed to render page: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Generates a whole site from a prompt.
pub struct SiteBuilder {
    config: BuildConfig,
    generator: Generator,
    website_dir: PathBuf,
    templates_dir: PathBuf,
}

impl SiteBuilder {
    /// Create a builder, wiping and recreating the output directory.
    pub fn new(config: BuildConfig, generator: Generator) -> Result<Self, BuildError> {
        let output_dir = &config.output_dir;

        if output_dir.exists() {
            tracing::info!("Deleting existing output directory {}", output_dir.display());
            fs::remove_dir_all(output_dir).map_err(|e| prepare_error(output_dir, e))?;
        }

        let website_dir = output_dir.join("website");
        for dir in [website_dir.join("images"), website_dir.join("css")] {
            fs::create_dir_all(&dir).map_err(|e| prepare_error(&dir, e))?;
        }
        tracing::info!("Created clean output directory at {}", output_dir.display());

        let templates_dir = config
            .templates_dir
            .clone()
            .unwrap_or_else(|| output_dir.join("templates"));

        Ok(Self {
            config,
            generator,
            website_dir,
            templates_dir,
        })
    }

    pub fn website_dir(&self) -> &Path {
        &self.website_dir
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Run the full pipeline for `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        tracing::info!("Starting website generation for prompt: '{}'", prompt);

        let plan = self
            .generator
            .generate_master_plan(prompt)
            .await
            .ok_or(BuildError::PlanUnavailable)?;

        let plan_json = serde_json::to_string_pretty(&plan)
            .map_err(|e| BuildError::SerializeError(e.to_string()))?;
        write_file(&self.config.output_dir.join("master_plan.json"), &plan_json)?;
        tracing::info!("master_plan.json saved");

        let design_doc = self.generator.write_design_doc(&plan).await;
        write_file(&self.config.output_dir.join("design_document.md"), &design_doc)?;
        tracing::info!("design_document.md saved");

        let design_specs = extract_design_specs(&design_doc);

        let css = self.generator.generate_css(&plan, &design_specs).await;
        let css = AssetPipeline::finish_css(&css, self.config.minify_css);
        write_file(&self.website_dir.join("css").join("style.css"), &css)?;
        tracing::info!("style.css saved");

        let templates = self.generate_templates(&plan).await?;

        tracing::info!("Assembling website");
        let content = self.render_sections(&plan).await;

        let html = render_page(&plan.site_title, &content)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;
        let index_path = self.website_dir.join("index.html");
        write_file(&index_path, &html)?;
        tracing::info!("index.html saved");

        Ok(BuildResult {
            sections: plan.sections.len(),
            templates,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
            index_path,
        })
    }

    /// Recreate the templates directory and generate one template per section type.
    ///
    /// Types whose generation fails get no file; rendering reports them as missing.
    async fn generate_templates(&self, plan: &MasterPlan) -> Result<usize, BuildError> {
        let dir = &self.templates_dir;

        if dir.exists() {
            fs::remove_dir_all(dir).map_err(|e| prepare_error(dir, e))?;
        }
        fs::create_dir_all(dir).map_err(|e| prepare_error(dir, e))?;
        tracing::info!("Cleared old templates");

        let mut written = 0;
        for section_type in plan.section_types() {
            let Some(file_name) = template_file_name(section_type) else {
                tracing::warn!("Skipping section type '{}': not a valid template name", section_type);
                continue;
            };

            let example = plan.example_content(section_type).cloned().unwrap_or_default();
            match self.generator.generate_template(section_type, &example).await {
                Some(html) => {
                    write_file(&dir.join(file_name), &html)?;
                    written += 1;
                }
                None => {
                    tracing::warn!("No template generated for '{}'", section_type);
                }
            }
        }

        Ok(written)
    }

    /// Render every section in plan order.
    async fn render_sections(&self, plan: &MasterPlan) -> String {
        let mut renderer = SectionRenderer::new(&self.templates_dir, self.config.fix_policy);
        let mut content = String::new();

        for section in &plan.sections {
            content.push_str(&renderer.render(section, &self.generator).await);
            content.push('\n');
        }

        content
    }
}

fn prepare_error(path: &Path, e: std::io::Error) -> BuildError {
    BuildError::PrepareError(format!("{}: {}", path.display(), e))
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    fs::write(path, contents).map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}
