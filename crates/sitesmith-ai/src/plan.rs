//! The master plan: structural description of the site produced by the model.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Title used when the plan does not name the site.
pub const DEFAULT_SITE_TITLE: &str = "AI Generated Website";

/// Theme used when the plan does not describe one.
pub const DEFAULT_THEME: &str = "A modern, professional website.";

/// Structured plan for a whole site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterPlan {
    #[serde(default = "default_site_title", deserialize_with = "site_title_or_default")]
    pub site_title: String,

    #[serde(default = "default_theme", deserialize_with = "theme_or_default")]
    pub theme_description: String,

    #[serde(default, deserialize_with = "sections_or_empty")]
    pub sections: Vec<Section>,
}

/// One block of the page.
///
/// Both fields are optional on the wire so a malformed section survives
/// parsing and is reported at render time instead. A `type` that is not a
/// string reads as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,

    #[serde(default)]
    pub content: Value,
}

/// Errors that can occur when parsing a plan.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("invalid plan JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid cleanup pattern: {0}")]
    Pattern(#[from] regex::Error),
}

fn default_site_title() -> String {
    DEFAULT_SITE_TITLE.to_string()
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn site_title_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(string_or_none(deserializer)?.unwrap_or_else(default_site_title))
}

fn theme_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(string_or_none(deserializer)?.unwrap_or_else(default_theme))
}

/// Keeps every list entry; entries that are not objects become empty sections.
fn sections_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Section>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).unwrap_or(Section {
                kind: None,
                content: Value::Null,
            })
        })
        .collect())
}

impl MasterPlan {
    /// Parse model output, tolerating trailing commas before `]` or `}`.
    pub fn parse(text: &str) -> Result<Self, PlanError> {
        let trailing_commas = Regex::new(r",\s*([\]}])")?;
        let cleaned = trailing_commas.replace_all(text, "$1");
        Ok(serde_json::from_str(&cleaned)?)
    }

    /// Distinct section types in first-appearance order.
    pub fn section_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for kind in self.sections.iter().filter_map(|s| s.kind.as_deref()) {
            if !kind.is_empty() && !types.contains(&kind) {
                types.push(kind);
            }
        }
        types
    }

    /// Content of the first section with the given type.
    pub fn example_content(&self, kind: &str) -> Option<&Value> {
        self.sections
            .iter()
            .find(|s| s.kind.as_deref() == Some(kind))
            .map(|s| &s.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_plan() {
        let plan = MasterPlan::parse(
            r#"{
                "site_title": "Idol Gallery",
                "theme_description": "Neon pastel",
                "sections": [
                    {"type": "hero_section", "content": {"headline": "Hi"}},
                    {"type": "footer_section", "content": {"copyright": "2025"}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(plan.site_title, "Idol Gallery");
        assert_eq!(plan.sections.len(), 2);
        assert_eq!(plan.sections[0].kind.as_deref(), Some("hero_section"));
        assert_eq!(plan.sections[1].content["copyright"], "2025");
    }

    #[test]
    fn removes_trailing_commas() {
        let plan = MasterPlan::parse(
            r#"{"site_title": "T", "sections": [{"type": "a", "content": {"x": [1, 2,],},},],}"#,
        )
        .unwrap();

        assert_eq!(plan.sections[0].content["x"], json!([1, 2]));
    }

    #[test]
    fn fills_missing_fields() {
        let plan = MasterPlan::parse(r#"{"sections": [{"content": {}}, {"type": "x"}]}"#).unwrap();

        assert_eq!(plan.site_title, DEFAULT_SITE_TITLE);
        assert_eq!(plan.theme_description, DEFAULT_THEME);
        assert_eq!(plan.sections[0].kind, None);
        assert_eq!(plan.sections[1].content, Value::Null);
    }

    #[test]
    fn non_string_type_reads_as_missing() {
        let plan = MasterPlan::parse(
            r#"{"sections":[{"type":"hero_section","content":{}},{"type":5,"content":{}},{"type":["a"]},{"type":{"k":1}}]}"#,
        )
        .unwrap();

        assert_eq!(plan.sections.len(), 4);
        assert_eq!(plan.sections[0].kind.as_deref(), Some("hero_section"));
        assert!(plan.sections[1..].iter().all(|s| s.kind.is_none()));
        assert_eq!(plan.sections[1].content, json!({}));
        assert_eq!(plan.section_types(), vec!["hero_section"]);
    }

    #[test]
    fn null_or_odd_header_fields_fall_back() {
        let plan = MasterPlan::parse(
            r#"{"site_title": null, "theme_description": 7, "sections": [{"type": "a"}]}"#,
        )
        .unwrap();

        assert_eq!(plan.site_title, DEFAULT_SITE_TITLE);
        assert_eq!(plan.theme_description, DEFAULT_THEME);
        assert_eq!(plan.sections.len(), 1);
    }

    #[test]
    fn odd_section_entries_survive() {
        let plan = MasterPlan::parse(r#"{"sections": ["hero", null, {"type": "x"}]}"#).unwrap();
        assert_eq!(plan.sections.len(), 3);
        assert_eq!(plan.sections[0].kind, None);
        assert_eq!(plan.sections[2].kind.as_deref(), Some("x"));

        let plan = MasterPlan::parse(r#"{"sections": {"type": "x"}}"#).unwrap();
        assert!(plan.sections.is_empty());
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            MasterPlan::parse("Sure! Here is your plan."),
            Err(PlanError::Json(_))
        ));
    }

    #[test]
    fn lists_distinct_types_in_order() {
        let plan = MasterPlan::parse(
            r#"{"sections": [
                {"type": "hero_section"},
                {"type": "gallery_section"},
                {"type": "hero_section"},
                {"content": {}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(plan.section_types(), vec!["hero_section", "gallery_section"]);
    }

    #[test]
    fn example_content_is_first_match() {
        let plan = MasterPlan::parse(
            r#"{"sections": [
                {"type": "card", "content": {"n": 1}},
                {"type": "card", "content": {"n": 2}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(plan.example_content("card"), Some(&json!({"n": 1})));
        assert_eq!(plan.example_content("missing"), None);
    }
}
