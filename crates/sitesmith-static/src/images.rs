//! Image directives: `{image_prompt, image_size}` objects inside section content.

use serde_json::{Map, Value};

/// Placeholder image address for a prompt and a free-form size description.
pub fn placeholder_image_url(prompt: &str, size: &str) -> String {
    let (width, height) = dimensions(size);

    let text: String = prompt
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .take(40)
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();

    format!("https://via.placeholder.com/{width}x{height}.png?text={text}")
}

/// Map a size description onto a pixel bucket.
fn dimensions(size: &str) -> (u32, u32) {
    let size = size.trim().to_lowercase();

    if size.contains("large") || size.contains("widescreen") {
        (1920, 1080)
    } else if size.contains("medium") || size.contains("portrait") {
        (1080, 1350)
    } else if size.contains("square") {
        (1080, 1080)
    } else {
        (1024, 768)
    }
}

/// Return a copy of `content` where every image directive carries an `image_url`.
///
/// The input tree is left untouched.
pub fn with_image_urls(content: &Value) -> Value {
    match content {
        Value::Object(map) => {
            let mut out: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), with_image_urls(v)))
                .collect();

            if let (Some(prompt), Some(size)) = (map.get("image_prompt"), map.get("image_size")) {
                let url = placeholder_image_url(&scalar_text(prompt), &scalar_text(size));
                out.insert("image_url".to_string(), Value::String(url));
            }

            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(with_image_urls).collect()),
        other => other.clone(),
    }
}

/// Text form of a directive field; numbers and other scalars are stringified.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
