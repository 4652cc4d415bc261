//! Attribute / directive normalization.
//!
//! Source attributes come in many shapes: `id="app"`, `disabled`,
//! `id={x}`, `href="page/{p}"`, `{id}`, `{...things}`, `on:click={h}` and
//! so on. Everything downstream only sees two shapes: a [`StaticAttribute`]
//! written verbatim into the template, or a [`BoundDirective`].

use crate::{
    ast::{
        Attribute, AttributeChunk, AttributeNode, AttributeValue, Directive, DirectiveKind,
        Spread,
    },
    error::{CompilationError, CompilationErrorKind as ErrorKind, CompileResult},
    ir::SimpleExpression,
    js,
    util::is_simple_identifier,
    SourceLocation,
};

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StaticAttribute {
    pub name: String,
    /// literal text, empty for valueless attributes
    pub value: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BoundDirective {
    /// `bind`, `on`, `model`, `class`, `style`, `ref` or a custom name
    pub name: String,
    pub arg: Option<SimpleExpression>,
    pub exp: Option<SimpleExpression>,
    pub modifiers: Vec<String>,
    pub location: SourceLocation,
}

impl BoundDirective {
    fn new(name: &str, location: &SourceLocation) -> Self {
        Self {
            name: name.into(),
            arg: None,
            exp: None,
            modifiers: vec![],
            location: location.clone(),
        }
    }

    /// Static argument name, e.g. `href` in `bind` of `href={x}`.
    pub fn static_arg(&self) -> Option<&str> {
        match &self.arg {
            Some(arg) if arg.is_static => Some(&arg.content),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ElementProp {
    Attribute(StaticAttribute),
    Directive(BoundDirective),
}

pub fn normalize_attributes(attrs: &[AttributeNode]) -> CompileResult<Vec<ElementProp>> {
    attrs.iter().map(normalize_attribute).collect()
}

pub fn normalize_attribute(attr: &AttributeNode) -> CompileResult<ElementProp> {
    match attr {
        AttributeNode::Attribute(a) => normalize_plain(a),
        AttributeNode::Spread(s) => Ok(ElementProp::Directive(normalize_spread(s))),
        AttributeNode::Directive(d) => normalize_directive(d).map(ElementProp::Directive),
    }
}

fn normalize_plain(attr: &Attribute) -> CompileResult<ElementProp> {
    let Attribute {
        name,
        value,
        location,
    } = attr;
    let chunks = match value {
        AttributeValue::Boolean => {
            return Ok(ElementProp::Attribute(StaticAttribute {
                name: name.clone(),
                value: String::new(),
                location: location.clone(),
            }))
        }
        AttributeValue::Chunks(chunks) => chunks,
    };
    let exp = match chunks.as_slice() {
        [AttributeChunk::Text(t)] => {
            return Ok(ElementProp::Attribute(StaticAttribute {
                name: name.clone(),
                value: t.data.clone(),
                location: location.clone(),
            }))
        }
        [AttributeChunk::Mustache(e)] | [AttributeChunk::Shorthand(e)] => {
            SimpleExpression::from(e)
        }
        _ => concat_chunks(chunks).ok_or_else(|| malformed_attribute(attr))?,
    };
    let mut dir = BoundDirective::new("bind", location);
    dir.arg = Some(static_arg(name, location));
    dir.exp = Some(exp);
    Ok(ElementProp::Directive(dir))
}

/// `"page/{p}"` becomes `"page/" + p`. The result is a string even
/// when it starts with two expressions.
fn concat_chunks(chunks: &[AttributeChunk]) -> Option<SimpleExpression> {
    let (first, last) = (chunks.first()?, chunks.last()?);
    let mut parts = Vec::with_capacity(chunks.len() + 1);
    for chunk in chunks {
        let part = match chunk {
            AttributeChunk::Text(t) => js::quote(&t.data),
            AttributeChunk::Mustache(e) => e.content.clone(),
            // shorthand stands for the whole value
            AttributeChunk::Shorthand(_) => return None,
        };
        parts.push(part);
    }
    let is_str = |c: Option<&AttributeChunk>| matches!(c, Some(AttributeChunk::Text(_)));
    if !is_str(chunks.first()) && !is_str(chunks.get(1)) {
        parts.insert(0, js::quote(""));
    }
    let location = first.location().cover(last.location());
    Some(SimpleExpression::dynamic(js::concat(&parts), location))
}

fn normalize_spread(spread: &Spread) -> BoundDirective {
    let mut dir = BoundDirective::new("bind", &spread.location);
    dir.exp = Some(SimpleExpression::from(&spread.expression));
    dir
}

fn normalize_directive(d: &Directive) -> CompileResult<BoundDirective> {
    use DirectiveKind as K;
    let Directive {
        kind,
        name,
        modifiers,
        location,
        ..
    } = d;
    let mut dir = match kind {
        K::EventHandler => {
            let mut dir = BoundDirective::new("on", location);
            dir.arg = Some(static_arg(name, location));
            // `on:click` alone forwards the event
            let forward = || {
                let emit = format!("() => $emit({})", js::quote(name));
                SimpleExpression::dynamic(emit, location.clone())
            };
            dir.exp = Some(directive_value(d)?.unwrap_or_else(forward));
            dir
        }
        K::Binding if name == "this" => {
            let mut dir = BoundDirective::new("ref", location);
            dir.exp = directive_value(d)?;
            dir
        }
        K::Binding | K::Class | K::StyleDirective => {
            let dir_name = match kind {
                K::Binding => "model",
                K::Class => "class",
                _ => "style",
            };
            let mut dir = BoundDirective::new(dir_name, location);
            dir.arg = Some(static_arg(name, location));
            dir.exp = match directive_value(d)? {
                Some(exp) => Some(exp),
                None => Some(shorthand_value(d)?),
            };
            dir
        }
        K::Action => {
            let mut dir = BoundDirective::new(name, location);
            dir.exp = directive_value(d)?;
            dir
        }
        K::Ref => {
            let mut dir = BoundDirective::new("ref", location);
            dir.exp = Some(SimpleExpression::new_static(name.as_str(), location.clone()));
            dir
        }
        K::Transition | K::Animation | K::Let => {
            let construct = format!("{}:{}", kind.prefix(), name);
            return Err(CompilationError::not_implemented(&construct, location));
        }
    };
    dir.modifiers = modifiers.clone();
    Ok(dir)
}

/// Expression of a directive, `None` when the directive is valueless.
fn directive_value(d: &Directive) -> CompileResult<Option<SimpleExpression>> {
    let chunks = match &d.value {
        AttributeValue::Boolean => return Ok(None),
        AttributeValue::Chunks(chunks) => chunks,
    };
    match chunks.as_slice() {
        [AttributeChunk::Mustache(e)] => Ok(Some(SimpleExpression::from(e))),
        // style:color="red" and style:width="{w}px" read like attributes
        [AttributeChunk::Text(t)] if d.kind == DirectiveKind::StyleDirective => {
            let location = t.location.clone();
            Ok(Some(SimpleExpression::dynamic(js::quote(&t.data), location)))
        }
        _ if d.kind == DirectiveKind::StyleDirective => match concat_chunks(chunks) {
            Some(exp) => Ok(Some(exp)),
            None => Err(malformed_directive(d)),
        },
        _ => Err(malformed_directive(d)),
    }
}

/// `class:active` stands for `class:active={active}`.
fn shorthand_value(d: &Directive) -> CompileResult<SimpleExpression> {
    if !is_simple_identifier(&d.name) {
        return Err(malformed_directive(d));
    }
    let location = d.location.clone();
    Ok(SimpleExpression::dynamic(d.name.as_str(), location))
}

fn static_arg(name: &str, location: &SourceLocation) -> SimpleExpression {
    SimpleExpression::new_static(name, location.clone().with_source(name))
}

fn malformed_attribute(attr: &Attribute) -> CompilationError {
    CompilationError::new(ErrorKind::MalformedAttributeValue)
        .with_additional_message(attr.name.clone())
        .with_location(attr.location.clone())
}

fn malformed_directive(d: &Directive) -> CompilationError {
    CompilationError::new(ErrorKind::MalformedDirectiveValue)
        .with_additional_message(format!("{}:{}", d.kind.prefix(), d.name))
        .with_location(d.location.clone())
}
