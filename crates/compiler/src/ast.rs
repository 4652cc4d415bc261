//! Template AST handed over by the external parser.
//!
//! Every node kind is a closed variant. Embedded script expressions are
//! kept as source text; see [`crate::js`] for how they are analyzed.

use crate::SourceLocation;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Fragment {
    pub children: Vec<TemplateNode>,
    pub location: SourceLocation,
}

impl Fragment {
    pub fn new(children: Vec<TemplateNode>) -> Self {
        Self {
            children,
            location: Default::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TemplateNode {
    /// compile root and bodies of control-flow blocks
    Fragment(Fragment),
    Element(Element),
    Text(TextNode),
    Comment(Comment),
    /// `{expr}`
    MustacheTag(Expression),
    /// `{@html expr}`
    RawMustacheTag(Expression),
    IfBlock(IfBlock),
    EachBlock(EachBlock),
    AwaitBlock(AwaitBlock),
    KeyBlock(KeyBlock),
    /// `{@const ...}`
    ConstTag(Expression),
    /// `{@debug ...}`
    DebugTag(DebugTag),
}

impl Default for TemplateNode {
    fn default() -> Self {
        TemplateNode::Fragment(Fragment::default())
    }
}

impl TemplateNode {
    pub fn location(&self) -> &SourceLocation {
        use TemplateNode as N;
        match self {
            N::Fragment(f) => &f.location,
            N::Element(e) => &e.location,
            N::Text(t) => &t.location,
            N::Comment(c) => &c.location,
            N::MustacheTag(e) | N::RawMustacheTag(e) | N::ConstTag(e) => &e.location,
            N::IfBlock(i) => &i.location,
            N::EachBlock(e) => &e.location,
            N::AwaitBlock(a) => &a.location,
            N::KeyBlock(k) => &k.location,
            N::DebugTag(d) => &d.location,
        }
    }

    /// children traversed by the generic children transform
    pub fn children(&self) -> &[TemplateNode] {
        match self {
            TemplateNode::Fragment(f) => &f.children,
            TemplateNode::Element(e) => &e.children,
            _ => &[],
        }
    }

    /// text and interpolation merge into one runtime text node
    pub fn is_text_like(&self) -> bool {
        matches!(self, TemplateNode::Text(_) | TemplateNode::MustacheTag(_))
    }

    pub fn get_element(&self) -> Option<&Element> {
        match self {
            TemplateNode::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_whitespace_text(&self) -> bool {
        match self {
            TemplateNode::Text(t) => t.is_all_whitespace(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ElementKind {
    Regular,
    Component,
    /// `<slot>`
    SlotOutlet,
    /// `svelte:*` meta elements
    Special,
}

impl ElementKind {
    /// The classification the parser applies to a tag name.
    pub fn from_tag(tag: &str) -> Self {
        if tag.starts_with("svelte:") {
            ElementKind::Special
        } else if tag == "slot" {
            ElementKind::SlotOutlet
        } else if tag.contains('.') || tag.starts_with(|c: char| c.is_ascii_uppercase()) {
            ElementKind::Component
        } else {
            ElementKind::Regular
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    pub attributes: Vec<AttributeNode>,
    pub children: Vec<TemplateNode>,
    pub location: SourceLocation,
}

impl Element {
    pub fn is_component(&self) -> bool {
        self.kind == ElementKind::Component
    }

    /// Static value of a plain attribute, e.g. `type="radio"`.
    pub fn static_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find_map(|attr| match attr {
            AttributeNode::Attribute(a) if a.name == name => match &a.value {
                AttributeValue::Chunks(chunks) => match chunks.as_slice() {
                    [AttributeChunk::Text(t)] => Some(t.data.as_str()),
                    _ => None,
                },
                AttributeValue::Boolean => Some(""),
            },
            _ => None,
        })
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|attr| matches!(attr, AttributeNode::Attribute(a) if a.name == name))
    }

    /// Shallow copy left behind once the children became blocks.
    pub fn without_children(&self) -> Element {
        Element {
            name: self.name.clone(),
            kind: self.kind,
            attributes: self.attributes.clone(),
            children: vec![],
            location: self.location.clone(),
        }
    }

    pub fn has_spread(&self) -> bool {
        self.attributes
            .iter()
            .any(|attr| matches!(attr, AttributeNode::Spread(_)))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TextNode {
    /// entity-decoded text
    pub data: String,
    /// text as written in source
    pub raw: String,
    pub location: SourceLocation,
}

impl TextNode {
    pub fn is_all_whitespace(&self) -> bool {
        self.data.chars().all(|c| c.is_ascii_whitespace())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Comment {
    pub data: String,
    pub location: SourceLocation,
}

/// An embedded script expression with its source span.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Expression {
    pub content: String,
    pub location: SourceLocation,
}

impl Expression {
    pub fn new<S: Into<String>>(content: S, location: SourceLocation) -> Self {
        Self {
            content: content.into(),
            location,
        }
    }

    pub fn source(&self) -> &str {
        &self.content
    }
}

impl From<&str> for Expression {
    fn from(content: &str) -> Self {
        Self::new(content, SourceLocation::default().with_source(content))
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IfBlock {
    pub test: Expression,
    pub consequent: Fragment,
    pub alternate: Option<Fragment>,
    /// `{:else if}` is encoded as an alternate holding one `elseif` block
    pub elseif: bool,
    pub location: SourceLocation,
}

impl IfBlock {
    /// The chained `{:else if}` block, if the alternate is one.
    pub fn else_if(&self) -> Option<&IfBlock> {
        let alternate = self.alternate.as_ref()?;
        let mut nodes = alternate
            .children
            .iter()
            .filter(|n| !n.is_whitespace_text());
        match (nodes.next(), nodes.next()) {
            (Some(TemplateNode::IfBlock(b)), None) if b.elseif => Some(b),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EachBlock {
    pub expression: Expression,
    /// `as item` / `as { id, name }`, as written
    pub context: String,
    pub index: Option<String>,
    /// `(item.id)`
    pub key: Option<Expression>,
    pub children: Fragment,
    pub fallback: Option<Fragment>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AwaitBlock {
    pub expression: Expression,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct KeyBlock {
    pub expression: Expression,
    pub children: Fragment,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DebugTag {
    pub identifiers: Vec<String>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum AttributeNode {
    /// `id="app"`, `disabled`, `id={x}`, `href="page/{p}"`, `{id}`
    Attribute(Attribute),
    /// `{...things}`
    Spread(Spread),
    /// `on:click`, `bind:value`, `class:active`, ...
    Directive(Directive),
}

impl AttributeNode {
    pub fn location(&self) -> &SourceLocation {
        match self {
            AttributeNode::Attribute(a) => &a.location,
            AttributeNode::Spread(s) => &s.location,
            AttributeNode::Directive(d) => &d.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum AttributeValue {
    /// valueless attribute
    Boolean,
    Chunks(Vec<AttributeChunk>),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum AttributeChunk {
    Text(TextNode),
    Mustache(Expression),
    /// `{id}` standing for `id={id}`
    Shorthand(Expression),
}

impl AttributeChunk {
    pub fn location(&self) -> &SourceLocation {
        match self {
            AttributeChunk::Text(t) => &t.location,
            AttributeChunk::Mustache(e) | AttributeChunk::Shorthand(e) => &e.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Spread {
    pub expression: Expression,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum DirectiveKind {
    /// `on:`
    EventHandler,
    /// `bind:`
    Binding,
    /// `class:`
    Class,
    /// `style:`
    StyleDirective,
    /// `use:`
    Action,
    /// `transition:`, `in:`, `out:`
    Transition,
    /// `animate:`
    Animation,
    /// `let:`
    Let,
    /// `ref:`
    Ref,
}

impl DirectiveKind {
    pub fn prefix(&self) -> &'static str {
        use DirectiveKind::*;
        match self {
            EventHandler => "on",
            Binding => "bind",
            Class => "class",
            StyleDirective => "style",
            Action => "use",
            Transition => "transition",
            Animation => "animate",
            Let => "let",
            Ref => "ref",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Directive {
    pub kind: DirectiveKind,
    pub name: String,
    pub modifiers: Vec<String>,
    pub value: AttributeValue,
    pub location: SourceLocation,
}
