//! Stylesheet post-processing.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Prepare generated CSS for writing.
    ///
    /// With `minify` set the stylesheet goes through lightningcss; if it does
    /// not parse, the text is returned unchanged.
    pub fn finish_css(css: &str, minify: bool) -> String {
        if !minify {
            return css.to_string();
        }

        match Self::minify_css(css) {
            Ok(minified) => minified,
            Err(e) => {
                tracing::warn!("Writing stylesheet unminified: {}", e);
                css.to_string()
            }
        }
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSS: &str = r#"
:root {
    --color-primary: #FF3E9A;
}

.section-hero_section {
    background-color: var(--color-primary);
    padding: 10px;
}
"#;

    #[test]
    fn passes_through_without_minify() {
        assert_eq!(AssetPipeline::finish_css(CSS, false), CSS);
    }

    #[test]
    fn minifies_generated_css() {
        let minified = AssetPipeline::finish_css(CSS, true);

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".section-hero_section"));
        assert!(minified.contains("--color-primary"));
    }

    #[test]
    fn keeps_placeholder_comment_parseable() {
        let css = "/* AI failed to generate CSS. Please check logs. */";
        assert!(AssetPipeline::minify_css(css).is_ok());
    }
}
