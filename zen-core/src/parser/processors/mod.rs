//! Built-in tree processors

mod pasted;
mod resources;
mod tag_names;

pub use pasted::{insert_pasted_content, PastedInsertion, PastedLines, OUTPUT_PLACEHOLDER};
pub use resources::ResourceMatcher;
pub use tag_names::TagNameResolver;
