//! The block-structured intermediate representation.
//!
//! One [`RootIR`] is produced per compile call. Its [`BlockIR`] tree has one
//! block per control region: the root, every conditional branch, loop
//! body, slot and slot fallback. Element ids are allocated monotonically
//! within one compile call and never reused.

use crate::{
    ast::{Expression, TemplateNode},
    flags::DynamicFlag,
    js,
    normalizer::BoundDirective,
    scope::ScopeTree,
    util::is_global_allow_listed,
    SourceLocation,
};
use rustc_hash::FxHashSet;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SimpleExpression {
    /// source text, or the literal value when static
    pub content: String,
    pub is_static: bool,
    pub location: SourceLocation,
}

impl SimpleExpression {
    pub fn new_static<S: Into<String>>(content: S, location: SourceLocation) -> Self {
        Self {
            content: content.into(),
            is_static: true,
            location,
        }
    }

    /// A script expression given as source text.
    pub fn dynamic<S: Into<String>>(content: S, location: SourceLocation) -> Self {
        let content = content.into();
        let location = location.with_source(content.clone());
        Self {
            content,
            is_static: false,
            location,
        }
    }

    /// Compile-time string value. String literals and template literals
    /// without substitutions count, as does static content.
    pub fn literal_value(&self) -> Option<String> {
        if self.is_static {
            return Some(self.content.clone());
        }
        js::literal_string(&self.content)
    }

    /// Constant-valued expressions never change, so they need no effect.
    pub fn is_constant(&self) -> bool {
        if self.is_static {
            return true;
        }
        let tree = match ScopeTree::analyze_expression(&self.content) {
            Ok(tree) => tree,
            Err(_) => return false,
        };
        let constant = tree
            .free_references()
            .all(|r| is_global_allow_listed(r.name()));
        constant
    }
}

impl From<&Expression> for SimpleExpression {
    fn from(e: &Expression) -> Self {
        Self {
            content: e.content.clone(),
            is_static: false,
            location: e.location.clone().with_source(e.content.clone()),
        }
    }
}

/// Two expression lists are interchangeable for effect grouping.
pub fn is_same_expressions(a: &[SimpleExpression], b: &[SimpleExpression]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.content == y.content && x.is_static == y.is_static)
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DynamicInfo {
    pub id: Option<usize>,
    pub flags: DynamicFlag,
    /// id of the `<!>` placeholder the node is inserted before
    pub anchor: Option<usize>,
    /// one entry per traversed child, in source order
    pub children: Vec<DynamicInfo>,
    /// index into the template table
    pub template: Option<usize>,
    pub has_dynamic_child: bool,
}

impl DynamicInfo {
    pub fn is_dynamic(&self) -> bool {
        self.id.is_some() || self.has_dynamic_child || !self.flags.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BlockIR {
    /// source subtree the block was built from
    #[cfg_attr(feature = "serde", serde(skip))]
    pub node: TemplateNode,
    pub dynamic: DynamicInfo,
    pub effects: Vec<Effect>,
    pub operations: Vec<Operation>,
    /// ids of the block's root nodes
    pub returns: Vec<usize>,
}

impl BlockIR {
    pub fn new(node: TemplateNode) -> Self {
        Self {
            node,
            dynamic: DynamicInfo::default(),
            effects: vec![],
            operations: vec![],
            returns: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RootIR {
    /// deduplicated literal templates
    pub template: Vec<String>,
    pub block: BlockIR,
    /// component assets resolved at runtime
    pub components: FxHashSet<String>,
    /// custom directive assets resolved at runtime
    pub directives: FxHashSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Effect {
    pub expressions: Vec<SimpleExpression>,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PropModifier {
    /// force DOM property, `.`
    Prop,
    /// force attribute, `^`
    Attr,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IRProp {
    pub key: SimpleExpression,
    /// more than one value only for mergeable keys
    pub values: Vec<SimpleExpression>,
    pub modifier: Option<PropModifier>,
    pub runtime_camelize: bool,
    pub handler: bool,
    pub model: bool,
    pub model_modifiers: Vec<String>,
}

impl IRProp {
    /// Key and its only value are literals, so the prop can be
    /// written into the template.
    pub fn is_static(&self) -> bool {
        self.key.is_static && self.values.len() == 1 && self.values[0].is_static
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum IRProps {
    Static(Vec<IRProp>),
    /// whole-object bind, `{...obj}`
    Dynamic {
        value: SimpleExpression,
        handler: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EventModifiers {
    pub non_keys: Vec<String>,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ModelType {
    Text,
    Radio,
    Checkbox,
    Select,
    Dynamic,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IRSlot {
    pub name: String,
    pub block: BlockIR,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CreateComponentIRNode {
    pub id: usize,
    /// resolved tag, e.g. `Foo`, `$setup["Foo"]` or `Foo__self`
    pub tag: String,
    pub props: Vec<IRProps>,
    pub slots: Vec<IRSlot>,
    /// resolved at runtime from the registered components
    pub asset: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum IfNegative {
    Block(BlockIR),
    If(Box<IfIRNode>),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IfIRNode {
    pub id: usize,
    pub condition: SimpleExpression,
    pub positive: BlockIR,
    pub negative: Option<IfNegative>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ForIRNode {
    pub id: usize,
    pub source: SimpleExpression,
    pub value: SimpleExpression,
    pub index: Option<SimpleExpression>,
    pub key_prop: Option<SimpleExpression>,
    pub render: BlockIR,
    pub fallback: Option<BlockIR>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SlotOutletIRNode {
    pub id: usize,
    pub name: SimpleExpression,
    pub props: Vec<IRProps>,
    pub fallback: Option<BlockIR>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct WithDirectiveIRNode {
    pub element: usize,
    pub name: String,
    pub dir: BoundDirective,
    pub builtin: bool,
    /// resolved at runtime from the registered directives
    pub asset: bool,
    pub model_type: Option<ModelType>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Operation {
    SetProp {
        element: usize,
        prop: IRProp,
    },
    SetDynamicProps {
        element: usize,
        props: Vec<IRProps>,
    },
    SetText {
        element: usize,
        values: Vec<SimpleExpression>,
    },
    SetHtml {
        element: usize,
        value: SimpleExpression,
    },
    SetEvent {
        element: usize,
        key: SimpleExpression,
        value: Option<SimpleExpression>,
        modifiers: EventModifiers,
        /// the event name is itself dynamic
        effect: bool,
    },
    SetTemplateRef {
        element: usize,
        value: SimpleExpression,
        ref_for: bool,
    },
    CreateTextNode {
        id: usize,
        values: Vec<SimpleExpression>,
        effect: bool,
    },
    InsertNode {
        elements: Vec<usize>,
        parent: usize,
        anchor: Option<usize>,
    },
    PrependNode {
        elements: Vec<usize>,
        parent: usize,
    },
    CreateComponent(CreateComponentIRNode),
    If(IfIRNode),
    For(ForIRNode),
    SlotOutlet(SlotOutletIRNode),
    WithDirective(WithDirectiveIRNode),
}
