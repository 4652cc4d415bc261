use super::{is_builtin_directive, DirectiveTransformResult};
use crate::{
    ast::Element,
    error::{CompilationError, CompilationErrorKind as ErrorKind, CompileResult},
    ir::{IRProp, IRProps, Operation, SimpleExpression, WithDirectiveIRNode},
    normalizer::{BoundDirective, ElementProp, StaticAttribute},
    transformer::{resolve_setup_reference, TransformContext},
    util::{is_mergeable_prop, is_reserved_prop},
};
use rustc_hash::FxHashMap;
use std::mem;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum PropsResult {
    /// every key is static, duplicates are merged
    Static(Vec<IRProp>),
    /// at least one key is only known at runtime
    Dynamic {
        props: Vec<IRProps>,
        /// everything the props depend on
        expressions: Vec<SimpleExpression>,
    },
}

impl PropsResult {
    pub fn into_props(self) -> Vec<IRProps> {
        match self {
            PropsResult::Static(props) if props.is_empty() => vec![],
            PropsResult::Static(props) => vec![IRProps::Static(props)],
            PropsResult::Dynamic { props, .. } => props,
        }
    }
}

#[derive(Default)]
/// collecting props for one element. e.g:
/// `<div id="a" {...obj}/>` becomes `[{ id: "a" }, obj]`
struct CollectProps {
    /// pending properties, e.g. (prop, val)
    pending: Vec<DirectiveTransformResult>,
    /// flushed props and whole-object binds
    dynamic_args: Vec<IRProps>,
    dynamic_exprs: Vec<SimpleExpression>,
}

impl CollectProps {
    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let pending = mem::take(&mut self.pending);
        self.dynamic_args
            .push(IRProps::Static(dedupe_properties(pending)));
    }
}

pub fn build_props<T>(
    e: &Element,
    elm_props: T,
    ctx: &mut TransformContext<'_>,
    is_component: bool,
) -> CompileResult<PropsResult>
where
    T: IntoIterator<Item = ElementProp>,
{
    let mut cp = CollectProps::default();
    for prop in elm_props {
        match prop {
            ElementProp::Attribute(attr) => collect_attr(attr, &mut cp),
            ElementProp::Directive(dir) => collect_dir(e, dir, ctx, is_component, &mut cp)?,
        }
    }
    if !cp.dynamic_args.is_empty() || cp.pending.iter().any(|r| !r.key.is_static) {
        cp.flush_pending();
        debug!(tag = %e.name, "element falls back to dynamic props");
        return Ok(PropsResult::Dynamic {
            props: cp.dynamic_args,
            expressions: cp.dynamic_exprs,
        });
    }
    Ok(PropsResult::Static(dedupe_properties(cp.pending)))
}

fn collect_attr(attr: StaticAttribute, cp: &mut CollectProps) {
    let StaticAttribute {
        name,
        value,
        location,
    } = attr;
    if is_reserved_prop(&name) {
        return;
    }
    let key_location = location.clone().with_source(name.as_str());
    let key = SimpleExpression::new_static(name.as_str(), key_location);
    let value =
        SimpleExpression::new_static(value.as_str(), location.with_source(value.as_str()));
    cp.pending.push(DirectiveTransformResult::new(key, value));
}

fn collect_dir(
    e: &Element,
    dir: BoundDirective,
    ctx: &mut TransformContext<'_>,
    is_component: bool,
    cp: &mut CollectProps,
) -> CompileResult<()> {
    // whole-object bind, {...obj}
    if dir.name == "bind" && dir.arg.is_none() {
        let exp = match dir.exp {
            Some(exp) => ctx.process_expression(exp)?,
            None => {
                let error = CompilationError::new(ErrorKind::VBindNoExpression);
                return Err(error.with_location(dir.location));
            }
        };
        cp.flush_pending();
        cp.dynamic_exprs.push(exp.clone());
        cp.dynamic_args.push(IRProps::Dynamic {
            value: exp,
            handler: false,
        });
        return Ok(());
    }
    let result = match transform_directive(e, &dir, ctx)? {
        Some(result) => result,
        None => return Ok(()),
    };
    let mut result = result;
    if !result.key.is_static {
        result.key = ctx.process_expression(result.key)?;
    }
    result.value = ctx.process_expression(result.value)?;
    cp.dynamic_exprs.push(result.key.clone());
    cp.dynamic_exprs.push(result.value.clone());
    if is_component && !result.key.is_static {
        cp.flush_pending();
        cp.dynamic_args.push(IRProps::Static(vec![result.into()]));
    } else {
        cp.pending.push(result);
    }
    Ok(())
}

fn transform_directive(
    e: &Element,
    dir: &BoundDirective,
    ctx: &mut TransformContext<'_>,
) -> CompileResult<Option<DirectiveTransformResult>> {
    let options = ctx.options;
    if let Some(transform) = options.directive_transforms.get(dir.name.as_str()) {
        return transform(dir, e, ctx);
    }
    if is_builtin_directive(&dir.name) {
        return Ok(None);
    }
    // custom directive, e.g. use:tooltip={params}
    let from_setup = resolve_setup_reference(&dir.name, ctx);
    let asset = from_setup.is_none();
    let name = from_setup.unwrap_or_else(|| dir.name.clone());
    if asset {
        ctx.unit.directives.insert(name.clone());
    }
    let mut dir = dir.clone();
    dir.exp = dir.exp.map(|exp| ctx.process_expression(exp)).transpose()?;
    let element = ctx.reference();
    ctx.register_operation(Operation::WithDirective(WithDirectiveIRNode {
        element,
        name,
        dir,
        builtin: false,
        asset,
        model_type: None,
    }));
    Ok(None)
}

/// Keeps the first of duplicated static keys. `class` and `style`
/// values are merged in encounter order instead.
fn dedupe_properties(results: Vec<DirectiveTransformResult>) -> Vec<IRProp> {
    let mut known_props = FxHashMap::default();
    let mut deduped: Vec<IRProp> = vec![];
    for result in results {
        let prop = IRProp::from(result);
        if !prop.key.is_static {
            deduped.push(prop);
            continue;
        }
        let name = prop.key.content.clone();
        if let Some(&i) = known_props.get(&name) {
            if is_mergeable_prop(&name) {
                merge_prop_values(&mut deduped[i], prop);
            }
            // other duplicates are reported by the parser
        } else {
            known_props.insert(name, deduped.len());
            deduped.push(prop);
        }
    }
    deduped
}

fn merge_prop_values(existing: &mut IRProp, incoming: IRProp) {
    existing.values.extend(incoming.values);
}
