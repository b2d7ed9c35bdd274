//! Static site assembly for sitesmith.
//!
//! Turns a master plan into a finished site: design specs, stylesheet,
//! per-section templates and the final page.

pub mod assets;
pub mod builder;
pub mod design_spec;
pub mod images;
pub mod templates;

#[cfg(test)]
mod test_support;

pub use builder::{BuildConfig, BuildError, BuildResult, SiteBuilder};
pub use design_spec::extract_design_specs;
pub use images::{placeholder_image_url, with_image_urls};
pub use templates::{render_page, FixPolicy, SectionRenderer};
