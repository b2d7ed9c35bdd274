//! Section templates and the page shell.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use minijinja::{context, path_loader, AutoEscape, Environment, UndefinedBehavior};
use serde_json::Value;
use sitesmith_ai::{Generator, Section};

use crate::images::with_image_urls;

/// How many times a failing template may be sent back to the model for repair.
///
/// Retries happen immediately, without backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixPolicy {
    pub max_fix_attempts: usize,
}

impl Default for FixPolicy {
    fn default() -> Self {
        Self {
            max_fix_attempts: 1,
        }
    }
}

/// File name for a section type's template, if the type is usable as one.
///
/// Types come from model output, so anything that could leave the templates
/// directory is rejected.
pub fn template_file_name(section_type: &str) -> Option<String> {
    let valid = !section_type.is_empty()
        && section_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    valid.then(|| format!("{section_type}.html"))
}

/// HTML comment standing in for a section that could not be rendered.
fn placeholder(message: &str) -> String {
    let mut text = message.to_string();
    while text.contains("--") {
        text = text.replace("--", "- -");
    }
    format!("<!-- {text} -->")
}

/// Section content is inserted verbatim: the model writes inline markup into it.
fn environment(templates_dir: &Path) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_loader(path_loader(templates_dir.to_path_buf()));
    env.set_auto_escape_callback(|_: &str| AutoEscape::None);
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env
}

/// Renders sections through per-type templates stored on disk.
///
/// A template that fails to load or render is handed to the model for repair,
/// up to the limit set by [`FixPolicy`]. Rendering never fails: every problem
/// becomes an HTML comment in the output.
pub struct SectionRenderer {
    templates_dir: PathBuf,
    env: Environment<'static>,
    policy: FixPolicy,
}

impl SectionRenderer {
    pub fn new(templates_dir: impl Into<PathBuf>, policy: FixPolicy) -> Self {
        let templates_dir = templates_dir.into();
        Self {
            env: environment(&templates_dir),
            templates_dir,
            policy,
        }
    }

    /// Drop every cached template so the next lookup reads from disk.
    pub fn reload(&mut self) {
        self.env = environment(&self.templates_dir);
    }

    /// Render one section to an HTML fragment.
    pub async fn render(&mut self, section: &Section, fixer: &Generator) -> String {
        let Some(kind) = section.kind.as_deref().filter(|k| !k.is_empty()) else {
            return placeholder("Section data is missing a 'type' key.");
        };

        let Some(name) = template_file_name(kind) else {
            return placeholder(&format!("Section type '{kind}' is not a valid template name."));
        };

        let path = self.templates_dir.join(&name);
        if !path.is_file() {
            return placeholder(&format!("Template '{name}' not found."));
        }

        if !section.content.is_object() {
            return placeholder(&format!("Content for '{kind}' is not a valid object."));
        }

        let context = with_image_urls(&section.content);
        let mut fixes = 0;

        loop {
            let error = match self.try_render(&name, &context) {
                Ok(html) => return html,
                Err(e) => e,
            };

            tracing::warn!(
                attempt = fixes + 1,
                "Failed to load/render '{}': {}",
                name,
                error
            );

            if fixes >= self.policy.max_fix_attempts {
                tracing::error!("Giving up on '{}' after {} fix attempt(s)", name, fixes);
                return placeholder(&format!(
                    "ERROR: Failed to render {kind} template after {fixes} fix attempt(s): {error}"
                ));
            }
            fixes += 1;

            tracing::info!("Invoking template fixer for '{}'", name);
            match self.repair(&path, kind, &error.to_string(), fixer).await {
                Ok(true) => continue,
                Ok(false) => {
                    return placeholder(&format!("ERROR: AI-Fixer failed to correct {kind} template."));
                }
                Err(e) => {
                    tracing::error!("Template fixer could not access '{}': {}", path.display(), e);
                    return placeholder(&format!(
                        "ERROR: AI-Fixer process failed for {kind}. Check logs."
                    ));
                }
            }
        }
    }

    fn try_render(&self, name: &str, context: &Value) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(name)?;
        template.render(context)
    }

    /// Replace the template with the model's correction. `Ok(false)` if none came back.
    async fn repair(
        &mut self,
        path: &Path,
        kind: &str,
        error: &str,
        fixer: &Generator,
    ) -> io::Result<bool> {
        let broken = fs::read_to_string(path)?;

        let Some(fixed) = fixer.fix_template(&broken, error, kind).await else {
            return Ok(false);
        };

        fs::write(path, fixed)?;
        tracing::info!("Reloading template environment after fix");
        self.reload();
        Ok(true)
    }
}

/// Wrap rendered sections in the fixed page shell.
pub fn render_page(site_title: &str, content: &str) -> Result<String, minijinja::Error> {
    let env = Environment::new();
    let template = env.template_from_named_str("page.html", PAGE_TEMPLATE)?;

    template.render(context! {
        site_title => site_title,
        content => content,
    })
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ site_title or 'AI Generated Website' }}</title>
    <link rel="stylesheet" href="css/style.css">
</head>
<body>
{{ content | safe }}
</body>
</html>
"##;
