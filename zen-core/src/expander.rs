//! Expansion entry point
//!
//! [`Expander`] owns every registry an expansion consults (vocabulary,
//! profiles, filters, preferences, parser processors, output processors) and
//! runs the whole pipeline:
//!
//! ```text
//! abbreviation ─▶ filter suffix ─▶ parse ─▶ profile ─▶ filters ─▶ render ─▶ carets ─▶ newlines
//! ```
//!
//! The expander is `Sync`; expansions only read its registries, so one instance
//! can serve concurrent callers. Mutating accessors take `&mut self`.

use crate::error::ExpandError;
use crate::filters::{extract_from_abbreviation, FilterContext, FilterRegistry};
use crate::handlers::HandlerList;
use crate::parser::{ContextNode, ParseOptions, Parser};
use crate::preferences::Preferences;
use crate::profile::{OutputProfile, ProfileSelector, Profiles};
use crate::render::{default_processors, render, OutputProcessor, RenderContext};
use crate::resources::Resources;
use crate::tabstops::{extract, finalize_carets, Extracted, CARET};
use crate::tree::AbbreviationTree;
use crate::utils::{escape_text, line_padding, split_by_lines, unindent_string};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ExpandOptions {
    pub syntax: String,
    /// Registered profile name or ad hoc profile, `None` picks the syntax default
    pub profile: Option<ProfileSelector>,
    pub context_node: Option<ContextNode>,
    pub pasted_content: Option<String>,
    pub counter: Option<usize>,
    /// Append `${0}` when the output has no caret
    pub insert_final_tabstop: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        ExpandOptions {
            syntax: "html".to_string(),
            profile: None,
            context_node: None,
            pasted_content: None,
            counter: None,
            insert_final_tabstop: false,
        }
    }
}

impl ExpandOptions {
    pub fn for_syntax(syntax: &str) -> Self {
        ExpandOptions {
            syntax: syntax.to_string(),
            ..Default::default()
        }
    }

    pub fn with_profile(mut self, profile: impl Into<ProfileSelector>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            syntax: self.syntax.clone(),
            context_node: self.context_node.clone(),
            pasted_content: self.pasted_content.clone(),
            counter: self.counter,
        }
    }
}

pub struct Expander {
    parser: Parser,
    resources: Resources,
    profiles: Profiles,
    filters: FilterRegistry,
    preferences: Preferences,
    output: HandlerList<Box<dyn OutputProcessor>>,
}

impl Expander {
    /// Expander over `resources` with the built-in parser, profiles, filters,
    /// preferences and output processors
    pub fn new(resources: Resources) -> Self {
        Expander {
            parser: Parser::with_defaults(),
            resources,
            profiles: Profiles::with_defaults(),
            filters: FilterRegistry::with_defaults(),
            preferences: Preferences::with_defaults(),
            output: default_processors(),
        }
    }

    /// Expander over the embedded system vocabulary
    pub fn with_defaults() -> Result<Self, ExpandError> {
        Ok(Self::new(Resources::with_defaults()?))
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn profiles(&self) -> &Profiles {
        &self.profiles
    }

    pub fn profiles_mut(&mut self) -> &mut Profiles {
        &mut self.profiles
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterRegistry {
        &mut self.filters
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    pub fn parser_mut(&mut self) -> &mut Parser {
        &mut self.parser
    }

    pub fn add_output_processor(&mut self, processor: impl OutputProcessor + 'static, priority: i32) {
        self.output.add(Box::new(processor), priority);
    }

    /// Profile an expansion with `options` would use
    pub fn profile_for(&self, options: &ExpandOptions) -> OutputProfile {
        self.profiles
            .resolve(options.profile.as_ref(), &options.syntax, &self.resources)
    }

    /// Parse `abbr` without rendering it. A `|filter` suffix is not allowed here.
    pub fn parse(&self, abbr: &str, options: &ExpandOptions) -> Result<AbbreviationTree, ExpandError> {
        self.parser
            .parse(abbr, &options.parse_options(), &self.resources)
    }

    /// Expand `abbr` into output text with tabstops. Empty input expands to an
    /// empty string.
    pub fn expand(&self, abbr: &str, options: &ExpandOptions) -> Result<String, ExpandError> {
        let abbr = abbr.trim();
        if abbr.is_empty() {
            return Ok(String::new());
        }

        let (abbr, extra_filters) = extract_from_abbreviation(abbr);
        let mut tree = self.parse(&abbr, options)?;

        let syntax = options.syntax.as_str();
        let profile = self.profile_for(options);
        let chain = self
            .filters
            .compose_list(syntax, &profile, &self.resources, &extra_filters);
        debug!(abbreviation = %abbr, syntax, filters = ?chain, "expanding");

        let ctx = FilterContext {
            profile: &profile,
            preferences: &self.preferences,
            resources: &self.resources,
            syntax,
        };
        self.filters.apply(&mut tree, &chain, &ctx)?;

        let mut render_ctx = RenderContext::new(&self.resources, syntax);
        let output = render(&tree, tree.root(), &self.output, &mut render_ctx);

        let mut output = finalize_carets(&output);
        if options.insert_final_tabstop && !output.contains(CARET) {
            output.push_str(CARET);
        }

        let newline = self
            .resources
            .get_variable(syntax, "newline")
            .unwrap_or_else(|| "\n".to_string());
        if newline != "\n" {
            output = output.replace('\n', &newline);
        }
        Ok(output)
    }

    /// Wrap `text` with `abbr`. Lines of `text` go to implicitly repeated
    /// nodes (`ul>li*`), otherwise the whole text lands in the deepest node.
    pub fn wrap(&self, abbr: &str, text: &str, options: &ExpandOptions) -> Result<String, ExpandError> {
        let escaped = escape_text(text);
        let first_line = split_by_lines(&escaped).first().copied().unwrap_or_default();
        let padding = line_padding(first_line).to_string();
        let pasted = unindent_string(&escaped, &padding).trim_end().to_string();

        let options = ExpandOptions {
            pasted_content: Some(pasted),
            ..options.clone()
        };
        self.expand(abbr, &options)
    }

    /// Expand `abbr` and strip the tabstop syntax, keeping the tabstop ranges
    pub fn extract(&self, abbr: &str, options: &ExpandOptions) -> Result<Extracted, ExpandError> {
        Ok(extract(&self.expand(abbr, options)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expander() -> Expander {
        Expander::with_defaults().unwrap()
    }

    fn html(abbr: &str) -> String {
        expander().expand(abbr, &ExpandOptions::default()).unwrap()
    }

    #[test]
    fn test_single_element() {
        assert_eq!(html("div"), "<div>${0}</div>");
    }

    #[test]
    fn test_siblings_get_distinct_carets() {
        assert_eq!(html("div+p"), "<div>${1}</div>\n<p>${2}</p>");
    }

    #[test]
    fn test_repeated_list() {
        assert_eq!(html("ul>li*2"), "<ul>\n\t<li>${1}</li>\n\t<li>${2}</li>\n</ul>");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(html("   "), "");
    }

    #[test]
    fn test_xml_syntax() {
        let out = expander()
            .expand("div>p", &ExpandOptions::for_syntax("xml"))
            .unwrap();
        assert_eq!(out, "<div>\n\t<p>${0}</p>\n</div>");
    }

    #[test]
    fn test_css_snippet() {
        let out = expander()
            .expand("m", &ExpandOptions::for_syntax("css"))
            .unwrap();
        assert_eq!(out, "margin:${0};");
    }

    #[test]
    fn test_explicit_profile() {
        let options = ExpandOptions::default().with_profile("xhtml");
        let out = expander().expand("br", &options).unwrap();
        assert_eq!(out, "<br />");
    }

    #[test]
    fn test_filter_suffix() {
        assert_eq!(html("p|e"), "&lt;p&gt;${0}&lt;/p&gt;");
    }

    #[test]
    fn test_final_tabstop() {
        let options = ExpandOptions {
            insert_final_tabstop: true,
            ..Default::default()
        };
        assert_eq!(expander().expand("br", &options).unwrap(), "<br>${0}");
    }

    #[test]
    fn test_custom_newline() {
        let mut expander = expander();
        expander.resources_mut().set_variable("newline", "\r\n");
        let out = expander.expand("div+p", &ExpandOptions::default()).unwrap();
        assert_eq!(out, "<div>${1}</div>\r\n<p>${2}</p>");
    }

    #[test]
    fn test_wrap_lines() {
        let out = expander()
            .wrap("ul>li*", "  one\n  two", &ExpandOptions::default())
            .unwrap();
        assert_eq!(out, "<ul>\n\t<li>one</li>\n\t<li>two</li>\n</ul>");
    }

    #[test]
    fn test_extract() {
        let extracted = expander()
            .extract("a", &ExpandOptions::default())
            .unwrap();
        assert_eq!(extracted.text, "<a href=\"\"></a>");
        assert_eq!(extracted.tabstops.len(), 2);
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = expander()
            .expand("div[", &ExpandOptions::default())
            .unwrap_err();
        assert!(matches!(err, ExpandError::UnbalancedDelimiter { position: 3, .. }));
    }
}
