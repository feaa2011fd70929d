//! Abbreviation to markup compiler
//!
//!     This crate expands short abbreviations (`ul>li.item*3`, `m10`) into full markup with
//!     editor tabstops (`${1}`, `${2:default}`, `${0}`).
//!
//!     TLDR: For vocabulary and filter authors:
//!         - Snippets, element abbreviations and references live in a JSON vocabulary, see
//!           resources/snippets.json for the embedded one. Users override it with their own tier.
//!         - Filters rewrite the rendered parts of every node (start, content, end). New output
//!           styles are new filters, not changes in the render step.
//!         - Tabstop numbering is owned by the output processors, filters only emit `${0}` carets.
//!
//! Architecture
//!
//!     The pipeline is linear and every stage operates on one arena tree (./tree):
//!
//!         abbreviation ─▶ parser ─▶ tree ─▶ filters ─▶ render ─▶ text with tabstops
//!
//!     The parser (./parser) owns the grammar, vocabulary matching, unrolling of repeated nodes and
//!     pasted text. Filters (./filters) decide the shape of the output for a syntax and an output
//!     profile (./profile). Rendering (./render) joins the parts and runs output processors for
//!     counters (./counter) and tabstops (./tabstops).
//!
//!     This is a pure lib: nothing here prints, reads the environment or touches files. The
//!     zen-cli and zen-config crates do that.
//!
//!     The file structure :
//!     .
//!     ├── expander.rs             # Expander, the entry point
//!     ├── parser
//!     │   ├── grammar.rs          # Operators, groups, multipliers
//!     │   ├── term.rs             # Names, ids, classes, attributes, text
//!     │   ├── unroll.rs           # Repeats and group squashing
//!     │   └── processors          # Vocabulary, tag names, pasted content
//!     ├── tree                    # Arena tree, attributes, queries
//!     ├── resources               # Vocabulary tiers, lookups, fuzzy matching
//!     ├── filters                 # html, haml, e, t, s, c, xsl and _format
//!     ├── profile.rs              # Output profiles
//!     ├── preferences.rs          # Typed preference registry
//!     ├── render.rs               # Output assembly and output processors
//!     ├── tabstops.rs             # Tabstop scanning, renumbering, extraction
//!     ├── counter.rs              # `$` numbering
//!     ├── element.rs              # Matched vocabulary entries
//!     ├── tag_name.rs             # Implicit tag names
//!     ├── handlers.rs             # Priority ordered handler lists
//!     ├── scanner.rs              # Character stream
//!     └── utils.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── parser
//!     ├── expand
//!     └── resources
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Usage
//!
//!     let expander = Expander::with_defaults()?;
//!     let html = expander.expand("ul>li*2", &ExpandOptions::default())?;
//!     assert_eq!(html, "<ul>\n\t<li>${1}</li>\n\t<li>${2}</li>\n</ul>");

pub mod counter;
pub mod element;
pub mod error;
pub mod expander;
pub mod filters;
pub mod handlers;
pub mod parser;
pub mod preferences;
pub mod profile;
pub mod render;
pub mod resources;
pub mod scanner;
pub mod tabstops;
pub mod tag_name;
pub mod tree;
pub mod utils;

pub use element::Resource;
pub use error::ExpandError;
pub use expander::{ExpandOptions, Expander};
pub use filters::{Filter, FilterContext, FilterRegistry};
pub use parser::{ContextNode, ParseOptions, Parser};
pub use preferences::{PreferenceValue, Preferences};
pub use profile::{OutputProfile, ProfileSelector, Profiles};
pub use resources::{Resources, VocabularyKind};
pub use tabstops::{Extracted, TabstopMark};
pub use tree::{AbbreviationTree, Attribute, NodeId};
