//! Abbreviation parser
//!
//! [`Parser::parse`] turns abbreviation text into a normalized tree:
//!
//! 1. The grammar builds the raw tree ([`grammar`]).
//! 2. An enclosing element, when given, names the root so implicit tag names
//!    can be inferred from it.
//! 3. Preprocessors run on the raw tree (vocabulary matching, pasted lines).
//! 4. Repeated nodes are unrolled and group nodes squashed ([`unroll`]).
//! 5. Postprocessors run on the final tree (tag names, pasted text).
//!
//! Pre- and postprocessors are [`TreeProcessor`]s held in priority order.

pub mod grammar;
pub mod processors;
pub mod term;
pub mod unroll;

use crate::error::ExpandError;
use crate::handlers::HandlerList;
use crate::resources::Resources;
use crate::tree::{AbbreviationTree, Attribute};
use processors::{PastedInsertion, PastedLines, ResourceMatcher, TagNameResolver};

/// Element enclosing the caret when expanding in place
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContextNode {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    pub syntax: String,
    pub context_node: Option<ContextNode>,
    /// Text being wrapped
    pub pasted_content: Option<String>,
    /// Counter applied to every node before unrolling
    pub counter: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            syntax: "html".to_string(),
            context_node: None,
            pasted_content: None,
            counter: None,
        }
    }
}

/// What a tree processor can see besides the tree
pub struct ParseContext<'a> {
    pub options: &'a ParseOptions,
    pub resources: &'a Resources,
}

/// A pass over the whole tree, run before or after unrolling
pub trait TreeProcessor: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, tree: &mut AbbreviationTree, ctx: &ParseContext) -> Result<(), ExpandError>;
}

pub struct Parser {
    preprocessors: HandlerList<Box<dyn TreeProcessor>>,
    postprocessors: HandlerList<Box<dyn TreeProcessor>>,
}

impl Parser {
    /// Parser without any processors
    pub fn new() -> Self {
        Parser {
            preprocessors: HandlerList::new(),
            postprocessors: HandlerList::new(),
        }
    }

    /// Parser with vocabulary matching, tag name inference and pasted content support
    pub fn with_defaults() -> Self {
        let mut parser = Self::new();
        parser.add_preprocessor(ResourceMatcher, 10);
        parser.add_preprocessor(PastedLines, 0);
        parser.add_postprocessor(TagNameResolver, 10);
        parser.add_postprocessor(PastedInsertion, 0);
        parser
    }

    /// Register a processor for the raw tree. Higher priorities run first.
    pub fn add_preprocessor(&mut self, processor: impl TreeProcessor + 'static, priority: i32) {
        self.preprocessors.add(Box::new(processor), priority);
    }

    /// Register a processor for the unrolled tree. Higher priorities run first.
    pub fn add_postprocessor(&mut self, processor: impl TreeProcessor + 'static, priority: i32) {
        self.postprocessors.add(Box::new(processor), priority);
    }

    /// Drop every pre- and postprocessor called `name`
    pub fn remove_processor(&mut self, name: &str) {
        self.preprocessors.remove_where(|p| p.name() == name);
        self.postprocessors.remove_where(|p| p.name() == name);
    }

    pub fn processor_names(&self) -> Vec<&str> {
        self.preprocessors
            .iter()
            .chain(self.postprocessors.iter())
            .map(|p| p.name())
            .collect()
    }

    pub fn parse(
        &self,
        abbr: &str,
        options: &ParseOptions,
        resources: &Resources,
    ) -> Result<AbbreviationTree, ExpandError> {
        let mut tree = grammar::parse_abbreviation(abbr)?;
        let root = tree.root();

        if let Some(context) = &options.context_node {
            tree.node_mut(root).name = context.name.clone();
            for attr in &context.attributes {
                tree.set_attribute(root, &attr.name, &attr.value);
            }
        }

        let ctx = ParseContext { options, resources };
        for processor in self.preprocessors.iter() {
            processor.process(&mut tree, &ctx)?;
        }

        if let Some(counter) = options.counter {
            tree.set_counter(root, counter);
        }
        unroll::unroll(&mut tree, root);
        unroll::squash(&mut tree, root);

        for processor in self.postprocessors.iter() {
            processor.process(&mut tree, &ctx)?;
        }

        Ok(tree)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::with_defaults()
    }
}
