//! Minimal HCL model and renderer.
//!
//! Only what the generator writes is modelled: attributes, nested blocks,
//! lists, maps, references, variable access and `${var.x}` interpolation.

pub mod escape;
pub mod render;
pub mod value;

pub use escape::{escape_string, is_identifier, quote, render_key, sanitize_comment};
pub use render::{render_block, render_body, render_value, Document, DocumentItem};
pub use value::{Block, Body, BodyItem, PathSegment, Reference, Template, TemplatePart, Value};
