//! Sitegen - Core Library
//!
//! Client-side model of generated websites: classification of the two
//! payload representations, structured project decoding, live preview
//! rendering, file exploration, archive export, and the dashboard workflows
//! that drive the generation service.

pub mod archive;
pub mod badges;
pub mod cache;
pub mod classify;
pub mod dashboard;
pub mod error;
pub mod explorer;
pub mod inspect;
pub mod preview;
pub mod project;
pub mod state;
pub mod templates;

pub use archive::*;
pub use badges::*;
pub use cache::*;
pub use classify::*;
pub use dashboard::*;
pub use error::*;
pub use explorer::*;
pub use preview::{render_preview, transpile_page, Preview, PreviewSource};
pub use project::*;
pub use state::*;
pub use templates::{fallback_artifact, TemplateKind};
