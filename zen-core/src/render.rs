//! Tree to text
//!
//! Each node renders as `start + content + end`. Before that, every registered
//! [`OutputProcessor`] rewrites the three parts in turn (counters, tabstop
//! renumbering). The rendered children are placed at the `${child}` variable of
//! the node content, or appended to it, and the content is indented with the
//! node's `padding`.

use crate::handlers::HandlerList;
use crate::resources::Resources;
use crate::tabstops::insert_child_content;
use crate::tree::{AbbreviationTree, NodeId};
use crate::utils::pad_string;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPart {
    Start,
    Content,
    End,
}

/// Per-expansion state shared by the output processors
pub struct RenderContext<'a> {
    pub resources: &'a Resources,
    pub syntax: &'a str,
    /// Offset added to numbered tabstops of the next processed string
    pub tabstop_index: usize,
    /// Placeholder index assigned to each unresolved variable
    pub placeholders: HashMap<String, usize>,
    pub next_placeholder: usize,
}

impl<'a> RenderContext<'a> {
    pub fn new(resources: &'a Resources, syntax: &'a str) -> Self {
        RenderContext {
            resources,
            syntax,
            tabstop_index: 0,
            placeholders: HashMap::new(),
            next_placeholder: 0,
        }
    }
}

/// Rewrites a node's rendered parts right before they are joined
pub trait OutputProcessor: Send + Sync {
    fn name(&self) -> &str;

    fn process(
        &self,
        text: &str,
        tree: &AbbreviationTree,
        node: NodeId,
        part: OutputPart,
        ctx: &mut RenderContext,
    ) -> String;
}

/// The built-in processors: counters, then tabstops
pub fn default_processors() -> HandlerList<Box<dyn OutputProcessor>> {
    let mut processors = HandlerList::new();
    crate::counter::register(&mut processors);
    crate::tabstops::register(&mut processors);
    processors
}

pub fn render(
    tree: &AbbreviationTree,
    id: NodeId,
    processors: &HandlerList<Box<dyn OutputProcessor>>,
    ctx: &mut RenderContext,
) -> String {
    let node = tree.node(id);
    let mut start = node.start.clone();
    let mut content = node.content.clone();
    let mut end = node.end.clone();
    for processor in processors.iter() {
        start = processor.process(&start, tree, id, OutputPart::Start, ctx);
        content = processor.process(&content, tree, id, OutputPart::Content, ctx);
        end = processor.process(&end, tree, id, OutputPart::End, ctx);
    }

    let inner: String = node
        .children
        .iter()
        .map(|child| render(tree, *child, processors, ctx))
        .collect();
    let content = insert_child_content(&content, &inner, false);

    format!("{}{}{}", start, pad_string(&content, &node.padding), end)
}
