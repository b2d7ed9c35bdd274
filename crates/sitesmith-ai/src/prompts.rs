//! Prompt builders for each pipeline stage.
//!
//! Every function here is a pure string builder; nothing touches the network
//! or the file system.

use serde_json::Value;

use crate::plan::MasterPlan;

/// Prompt asking for the master plan JSON for a site about `topic`.
pub fn master_plan(topic: &str) -> String {
    format!(
        r#"Act as a professional web design strategist. For a user requesting a website about "{topic}", create a comprehensive website plan in a single, valid JSON object.

The JSON object must contain:
- `site_title`: A creative and fitting title for the website.
- `theme_description`: A short paragraph describing the visual mood, style, and concept.
- `sections`: An array of objects, where each object represents a section of the website.
  Each section object must have:
  - `type`: A unique, descriptive, snake_case name for the section (e.g., "hero_section", "featured_models_section").
  - `content`: An object containing all the text and image data for that section. Use descriptive keys. If there's a list of items (like features, gallery images, models), use a key ending in `_list` (e.g., `features_list`, `gallery_images_list`). For images, provide an object with `image_prompt` and `image_size`.

Generate the full JSON plan now. Ensure the JSON is perfectly formatted, with no trailing commas or extra text.
"#
    )
}

/// Prompt asking for a Jinja-style HTML template for one section type.
pub fn section_template(section_type: &str, example_content: &Value) -> String {
    let example = serde_json::to_string_pretty(example_content).unwrap_or_else(|_| "{}".into());

    format!(
        r#"You are an expert Jinja2 and HTML template designer.
Generate a single, robust HTML `<section>` block for a section of type '{section_type}'.

**CRITICAL INSTRUCTIONS (MUST BE FOLLOWED):**

1.  **CSS CLASS NAMES:**
    *   The main `<section>` tag MUST have a class `section-{section_type}`.
    *   All child elements inside the section MUST use BEM-style class names. The format is `section-{section_type}__element--modifier`.
    *   Example: For `hero_section`, the title's class must be `section-hero_section__heading`. A button's class could be `section-hero_section__button` or `section-hero_section__cta`.
    *   **THIS IS NOT OPTIONAL. Follow this naming convention precisely.**

2.  **DATA RENDERING:**
    *   Use `{{{{ variable }}}}` for all text placeholders.
    *   **ALWAYS check for existence** with `{{% if variable %}}` before trying to display it.
    *   **LISTS:** For any key ending in `_list` (e.g., `models_list`), you MUST iterate over it using `{{% for item in models_list %}}`. Inside the loop, access properties with `{{{{ item.property }}}}`.
    *   **IMAGES:** If you find a key containing `image` (e.g., `image`, `background_image`, `preview_image`), it is an object. You MUST generate an `<img>` tag.
        - The `src` attribute MUST be `{{{{ ...image.image_url }}}}`. (e.g., `{{{{ image.image_url }}}}`, `{{{{ item.image.image_url }}}}`).
        - The `alt` attribute SHOULD be `{{{{ ...image.image_prompt }}}}`.
    *   **PLACEHOLDER PROMPTS:** If a key ends in `_prompt` (e.g., `search_filter_prompt`), simply render its text content within a `<div>` or `<p>` tag for placeholder purposes.

3.  **HTML STRUCTURE:**
    *   Use semantic HTML5.
    *   Wrap the entire output in a single `<section>...</section>` block.
    *   Do not include `<html>`, `<head>`, or `<body>` tags.
    *   Use Jinja2 comments `{{# ... #}}` for logic comments if needed.

**Example content keys for context (do not hardcode them, infer logic based on the rules above):**
```json
{example}
```
"#
    )
}

/// Prompt asking for the full stylesheet, pinned to the extracted design specs.
pub fn stylesheet(plan: &MasterPlan, design_specs: &str) -> String {
    let types = plan.section_types();
    let section_classes = types
        .iter()
        .map(|t| format!(".section-{t}"))
        .collect::<Vec<_>>()
        .join(", ");
    let child_classes = types
        .iter()
        .map(|t| format!(".section-{t}__heading"))
        .collect::<Vec<_>>()
        .join(", ");
    let theme = &plan.theme_description;

    format!(
        r#"You are a professional web designer and CSS expert.
Your task is to generate a complete, beautiful, and modern `style.css` file based on a theme description and a **strict set of design specifications**.

**Theme Description**: "{theme}"

**CRITICAL DESIGN SPECIFICATIONS (MUST BE FOLLOWED):**
You MUST use the exact colors and fonts provided below. DO NOT invent your own.
```css
{design_specs}
```

**CRITICAL INSTRUCTIONS (MUST BE FOLLOWED):**

1.  **USE THE PROVIDED SPECS:** You MUST use the CSS custom properties (e.g., `var(--color-primary)`) and `@import` the specified Google Fonts from the design specifications above, verbatim.
2.  **CLASS NAME MATCHING:** The HTML is built using BEM-style class names. Your CSS selectors MUST match this structure precisely.
    *   Style the main section containers, for example: `{section_classes}`.
    *   Style the child elements within each section, for example: `{child_classes}`.
    *   **THIS IS THE MOST IMPORTANT RULE. Your CSS will not work if the class names do not match.**
3.  **GENERATE COMPLETE CSS:** Include base styles for `body`, headings (`h1`, `h2`, etc.), paragraphs, and links.
4.  **RESPONSIVE DESIGN:** MUST include `@media` queries for mobile devices (e.g., `@media (max-width: 768px)`).
5.  **MODERN TECHNIQUES:** Use Flexbox or Grid for layout. Add subtle transitions for a premium feel.
6.  **OUTPUT RAW CSS ONLY:** Do not include `<style>` tags, markdown formatting like ```css, or any explanations.
"#
    )
}

/// Prompt asking for the Markdown design document describing the plan.
pub fn design_document(plan: &MasterPlan) -> String {
    let plan_json = serde_json::to_string_pretty(plan).unwrap_or_else(|_| "{}".into());

    format!(
        r#"You are a senior web design consultant and technical writer.
Based on the following JSON data representing a website plan, write a comprehensive and insightful design document in Markdown format.
Go into great detail for each section, explaining the "why" behind design choices and how they align with the project's goals.

The document must be structured with the following detailed sections:
## 1. Core Concept & Brand Story
- **Strategic Core:** Elaborate on the core brand identity derived from the `theme_description`.
- **Brand Narrative:** How will the website tell a story?
- **Key Messaging:** What are the primary messages the website should convey?

## 2. Visual Design Language
- **Overall Mood & Tone:** Describe the intended feeling.
- **Color Palette Rationale:** Propose a specific color palette (with hex codes) and justify each choice. Use a list or code block for clarity.
- **Typography Rationale:** Propose specific Google Fonts and explain why they are suitable. Wrap each font name in backticks. Use a list or code block for clarity.
- **Imagery & Iconography Style:** Describe the style of photography, referencing `image_prompt` examples.

## 3. Site Architecture & User Experience (UX)
- **Overall Structure:** Describe the page flow and navigation strategy.
- **Detailed Section Analysis:** For EACH section in the JSON, provide a breakdown of its Purpose, Content Strategy, and UX/UI Considerations.

Use the provided JSON data extensively to support your analysis. Be professional and detailed.

**JSON Data:**
```json
{plan_json}
```
"#
    )
}

/// Prompt asking the model to repair a template that failed to load or render.
pub fn fix_template(broken_html: &str, error_message: &str, section_type: &str) -> String {
    format!(
        r#"You are an expert Jinja2 and HTML template debugger. Your task is to fix a broken template file.

**Context:**
- The template is for a website section of type: `{section_type}`.
- When trying to load this template, the rendering engine produced the following error: "{error_message}"

**Broken Template Code:**
```html
{broken_html}
```

**Instructions:**
1.  Analyze the error message and the broken code.
2.  Identify the syntax error (e.g., mismatched tags, unclosed comments, incorrect loops).
3.  Correct the error and provide the complete, valid Jinja2/HTML code for the entire section.
4.  **CRITICAL: Do NOT add any explanations, apologies, or markdown formatting.** Only output the raw, corrected HTML code. Ensure all Jinja2 syntax (`{{% ... %}}`, `{{{{ ... }}}}`, `{{# ... #}}`) is perfectly valid.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan() -> MasterPlan {
        MasterPlan::parse(
            r#"{
                "site_title": "Idol Gallery",
                "theme_description": "Neon pastel glow",
                "sections": [
                    {"type": "hero_section", "content": {"headline": "Hi"}},
                    {"type": "footer_section", "content": {}}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn master_plan_names_topic_and_rules() {
        let prompt = master_plan("kpop models");
        assert!(prompt.contains("\"kpop models\""));
        assert!(prompt.contains("snake_case"));
        assert!(prompt.contains("_list"));
        assert!(prompt.contains("`image_prompt` and `image_size`"));
    }

    #[test]
    fn section_template_mandates_bem_classes() {
        let prompt = section_template("hero_section", &json!({"headline_list": []}));
        assert!(prompt.contains("class `section-hero_section`"));
        assert!(prompt.contains("`section-hero_section__element--modifier`"));
        assert!(prompt.contains("{{ image.image_url }}"));
        assert!(prompt.contains("{% for item in models_list %}"));
        assert!(prompt.contains("\"headline_list\""));
    }

    #[test]
    fn stylesheet_lists_every_section_class() {
        let prompt = stylesheet(&plan(), ":root { --color-primary: #fff; }");
        assert!(prompt.contains("Neon pastel glow"));
        assert!(prompt.contains("--color-primary: #fff;"));
        assert!(prompt.contains(".section-hero_section, .section-footer_section"));
        assert!(prompt.contains(".section-hero_section__heading"));
        assert!(prompt.contains("@media"));
    }

    #[test]
    fn design_document_embeds_plan_json() {
        let prompt = design_document(&plan());
        assert!(prompt.contains("## 2. Visual Design Language"));
        assert!(prompt.contains("Color Palette Rationale"));
        assert!(prompt.contains("Typography Rationale"));
        assert!(prompt.contains("\"site_title\": \"Idol Gallery\""));
    }

    #[test]
    fn fix_template_carries_error_and_markup() {
        let prompt = fix_template("<section>{% if x %}</section>", "unexpected end", "hero");
        assert!(prompt.contains("`hero`"));
        assert!(prompt.contains("\"unexpected end\""));
        assert!(prompt.contains("<section>{% if x %}</section>"));
        assert!(prompt.contains("`{% ... %}`"));
    }

    #[test]
    fn builders_are_deterministic() {
        assert_eq!(master_plan("x"), master_plan("x"));
        assert_eq!(design_document(&plan()), design_document(&plan()));
    }
}
