use crate::{
    ast::{Fragment, TemplateNode},
    converter::{get_base_directive_transforms, DirectiveTransformFn},
    error::{CompilationError, CompilationErrorKind, CompileResult},
    flags::BindingTypes,
    ir::{BlockIR, RootIR},
    transformer::{
        condense_whitespace, get_base_transform_preset, transform_node, CompileUnit, NodeTransform,
        TransformContext,
    },
};
use rustc_hash::FxHashMap;
use std::{
    ops::{Deref, DerefMut},
    rc::Rc,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitespaceStrategy {
    Condense,
    Preserve,
}

impl Default for WhitespaceStrategy {
    fn default() -> Self {
        WhitespaceStrategy::Condense
    }
}

/// stores binding variables exposed by the component script.
#[derive(Default, Debug, Clone)]
pub struct BindingMetadata(FxHashMap<String, BindingTypes>);

impl Deref for BindingMetadata {
    type Target = FxHashMap<String, BindingTypes>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for BindingMetadata {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<S: Into<String>> FromIterator<(S, BindingTypes)> for BindingMetadata {
    fn from_iter<I: IntoIterator<Item = (S, BindingTypes)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[derive(Clone)]
pub struct CompileOption {
    /// current file name, used to detect self-referencing components
    pub filename: String,
    pub whitespace: WhitespaceStrategy,
    /// Keep comments in the template.
    pub comments: bool,
    /// Rewrite free identifiers in expressions, e.g. `foo` to `_ctx.foo`.
    pub prefix_identifiers: bool,
    /// Compile the render function for inlining inside setup().
    /// This allows the function to directly access setup() local bindings.
    pub inline: bool,
    /// scoped style attribute added to every native element
    pub scope_id: Option<String>,
    pub ssr: bool,
    /// Optional binding metadata analyzed from script - used to optimize
    /// binding access when `prefix_identifiers` is enabled.
    pub binding_metadata: Rc<BindingMetadata>,
    pub node_transforms: Vec<NodeTransform>,
    pub directive_transforms: FxHashMap<&'static str, DirectiveTransformFn>,
}

impl Default for CompileOption {
    fn default() -> Self {
        Self {
            filename: String::new(),
            whitespace: WhitespaceStrategy::default(),
            comments: true,
            prefix_identifiers: false,
            inline: false,
            scope_id: None,
            ssr: false,
            binding_metadata: Rc::new(BindingMetadata::default()),
            node_transforms: get_base_transform_preset(),
            directive_transforms: get_base_directive_transforms(),
        }
    }
}

/// Compiles one template into its root IR. Any error aborts the compile.
#[tracing::instrument(level = "debug", skip_all, fields(filename = %option.filename))]
pub fn compile(root: &Fragment, option: &CompileOption) -> CompileResult<RootIR> {
    if option.ssr {
        let error = CompilationError::new(CompilationErrorKind::SsrNotSupported);
        return Err(error.with_location(root.location.clone()));
    }
    let mut root = root.clone();
    if option.whitespace == WhitespaceStrategy::Condense {
        condense_whitespace(&mut root);
    }
    let node = TemplateNode::Fragment(root);
    let mut block = BlockIR::new(TemplateNode::default());
    let mut unit = CompileUnit::default();
    let dynamic = {
        let mut ctx = TransformContext::new_root(&node, &mut block, &mut unit, option);
        ctx.reference();
        transform_node(&mut ctx)?;
        ctx.dynamic
    };
    block.dynamic = dynamic;
    block.node = node;
    debug!(
        templates = unit.template.len(),
        components = unit.components.len(),
        "template compiled"
    );
    Ok(RootIR {
        template: unit.template,
        block,
        components: unit.components,
        directives: unit.directives,
    })
}
