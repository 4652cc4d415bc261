/*!
Directive transforms and the props builder.

Element-level transforms hand the normalized attributes of one element to
[`build_props`], which decides between a flat static prop list and a
dynamic props descriptor. Each bound directive is looked up by name in the
configured directive transforms. Built-in transforms roughly correspond to
the following ones in vue-vapor.

# Transform directive
* vBind (`href={x}`)
* vOn (`on:click`)
* vModel (`bind:value`)
* class / style (`class:active`, `style:color`)
* templateRef (`bind:this`)
*/

use crate::{
    ast::Element,
    error::CompileResult,
    ir::{IRProp, PropModifier, SimpleExpression},
    normalizer::BoundDirective,
    transformer::TransformContext,
};
use rustc_hash::FxHashMap;

mod build_props;
mod class_style;
mod template_ref;
mod v_bind;
mod v_model;
mod v_on;

pub use build_props::{build_props, PropsResult};
pub use class_style::{V_CLASS, V_STYLE};
pub use template_ref::V_REF;
pub use v_bind::V_BIND;
pub use v_model::V_MODEL;
pub use v_on::V_ON;

/// A prop contributed by a directive. Transforms that only register
/// operations return `None` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveTransformResult {
    pub key: SimpleExpression,
    pub value: SimpleExpression,
    pub modifier: Option<PropModifier>,
    pub runtime_camelize: bool,
    pub handler: bool,
    pub model: bool,
    pub model_modifiers: Vec<String>,
}

impl DirectiveTransformResult {
    pub fn new(key: SimpleExpression, value: SimpleExpression) -> Self {
        Self {
            key,
            value,
            modifier: None,
            runtime_camelize: false,
            handler: false,
            model: false,
            model_modifiers: vec![],
        }
    }
}

impl From<DirectiveTransformResult> for IRProp {
    fn from(r: DirectiveTransformResult) -> Self {
        IRProp {
            key: r.key,
            values: vec![r.value],
            modifier: r.modifier,
            runtime_camelize: r.runtime_camelize,
            handler: r.handler,
            model: r.model,
            model_modifiers: r.model_modifiers,
        }
    }
}

pub type DirectiveTransformFn = fn(
    &BoundDirective,
    &Element,
    &mut TransformContext<'_>,
) -> CompileResult<Option<DirectiveTransformResult>>;
pub type DirectiveTransform = (&'static str, DirectiveTransformFn);

pub fn get_base_directive_transforms() -> FxHashMap<&'static str, DirectiveTransformFn> {
    [V_BIND, V_ON, V_MODEL, V_CLASS, V_STYLE, V_REF]
        .into_iter()
        .collect()
}

/// Names the normalizer produces for built-in syntax. Anything else
/// without a transform is a custom directive resolved at runtime.
pub fn is_builtin_directive(name: &str) -> bool {
    matches!(name, "bind" | "on" | "model" | "class" | "style" | "ref")
}
