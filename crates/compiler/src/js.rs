//! Embedded script expressions.
//!
//! Template expressions travel through the compiler as source text, the
//! way the external parser handed them over. Whenever a pass needs their
//! structure the text is parsed with `oxc_parser`; expressions the
//! compiler synthesizes are composed as source text from the pieces they
//! are built from.

use crate::{
    error::{CompilationError, CompilationErrorKind as ErrorKind, CompileResult},
    util::is_simple_identifier,
};
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingIdentifier, BindingPattern, BindingPatternKind, Expression, Program, Statement,
};
use oxc_parser::{ParseOptions, Parser};
use oxc_span::SourceType;

fn parse_options() -> ParseOptions {
    ParseOptions {
        preserve_parens: false,
        ..ParseOptions::default()
    }
}

fn invalid_expression(source: &str) -> CompilationError {
    CompilationError::new(ErrorKind::InvalidExpression).with_additional_message(source)
}

pub fn parse_expression<'a>(
    allocator: &'a Allocator,
    source: &'a str,
) -> CompileResult<Expression<'a>> {
    Parser::new(allocator, source, SourceType::mjs())
        .with_options(parse_options())
        .parse_expression()
        .map_err(|_| invalid_expression(source))
}

pub fn parse_program<'a>(allocator: &'a Allocator, source: &'a str) -> CompileResult<Program<'a>> {
    let ret = Parser::new(allocator, source, SourceType::mjs())
        .with_options(parse_options())
        .parse();
    if ret.panicked || !ret.errors.is_empty() {
        return Err(invalid_expression(source));
    }
    Ok(ret.program)
}

/// Parses `source` and hands the tree to `f`.
pub fn with_expression<T, F>(source: &str, f: F) -> CompileResult<T>
where
    F: FnOnce(&Expression<'_>) -> T,
{
    let allocator = Allocator::default();
    let expr = parse_expression(&allocator, source)?;
    Ok(f(&expr))
}

/// Names bound by a destructuring pattern such as `{ id, name: [first] }`.
pub fn pattern_bound_names(pattern: &str) -> CompileResult<Vec<String>> {
    let allocator = Allocator::default();
    let source = allocator.alloc_str(&format!("let {} = _;", pattern));
    let program = parse_program(&allocator, source)
        .map_err(|_| invalid_expression(pattern))?;
    let declarator = match program.body.first() {
        Some(Statement::VariableDeclaration(decl)) => decl.declarations.first(),
        _ => None,
    };
    let declarator = declarator.ok_or_else(|| invalid_expression(pattern))?;
    let mut ids = vec![];
    collect_bindings(&declarator.id, &mut ids);
    Ok(ids.into_iter().map(|id| id.name.as_str().to_string()).collect())
}

/// Flattens object, array, rest and default patterns into the
/// identifiers they bind, in source order.
pub fn collect_bindings<'b, 'a>(
    pattern: &'b BindingPattern<'a>,
    ids: &mut Vec<&'b BindingIdentifier<'a>>,
) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(id) => ids.push(&**id),
        BindingPatternKind::ObjectPattern(obj) => {
            for prop in obj.properties.iter() {
                collect_bindings(&prop.value, ids);
            }
            if let Some(rest) = &obj.rest {
                collect_bindings(&rest.argument, ids);
            }
        }
        BindingPatternKind::ArrayPattern(arr) => {
            for elem in arr.elements.iter().flatten() {
                collect_bindings(elem, ids);
            }
            if let Some(rest) = &arr.rest {
                collect_bindings(&rest.argument, ids);
            }
        }
        BindingPatternKind::AssignmentPattern(assign) => collect_bindings(&assign.left, ids),
    }
}

pub fn is_identifier(source: &str) -> bool {
    with_expression(source, |e| matches!(e, Expression::Identifier(_))).unwrap_or(false)
}

/// Valid left-hand side of a two-way binding.
pub fn is_member_or_identifier(source: &str) -> bool {
    with_expression(source, |e| {
        matches!(e, Expression::Identifier(_)) || e.is_member_expression()
    })
    .unwrap_or(false)
}

/// Value of a string literal, or of a template literal without
/// substitutions.
pub fn literal_string(source: &str) -> Option<String> {
    with_expression(source, |e| match e {
        Expression::StringLiteral(s) => Some(s.value.as_str().to_string()),
        Expression::TemplateLiteral(t) if t.expressions.is_empty() => t
            .quasis
            .first()
            .and_then(|q| q.value.cooked.as_ref())
            .map(|cooked| cooked.as_str().to_string()),
        _ => None,
    })
    .ok()
    .flatten()
}

/// Operands that read the same with or without surrounding parentheses.
fn is_operand(e: &Expression<'_>) -> bool {
    use Expression as E;
    matches!(
        e,
        E::Identifier(_)
            | E::StringLiteral(_)
            | E::NumericLiteral(_)
            | E::BooleanLiteral(_)
            | E::NullLiteral(_)
            | E::BigIntLiteral(_)
            | E::TemplateLiteral(_)
            | E::ThisExpression(_)
            | E::ArrayExpression(_)
            | E::ObjectExpression(_)
            | E::CallExpression(_)
            | E::NewExpression(_)
            | E::TaggedTemplateExpression(_)
    ) || e.is_member_expression()
}

fn operand(source: &str) -> String {
    if with_expression(source, is_operand).unwrap_or(false) {
        source.trim().to_string()
    } else {
        format!("({})", source.trim())
    }
}

/// JS string literal for `s`.
pub fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

/// `a + b + c` over already formed expressions.
pub fn concat<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| operand(p.as_ref()))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Object literal from keys and already formed value expressions.
pub fn object<K: AsRef<str>, V: AsRef<str>>(entries: &[(K, V)]) -> String {
    if entries.is_empty() {
        return "{}".into();
    }
    let props: Vec<_> = entries
        .iter()
        .map(|(key, value)| {
            let key = key.as_ref();
            let value = value.as_ref().trim();
            let is_sequence =
                with_expression(value, |e| matches!(e, Expression::SequenceExpression(_)))
                    .unwrap_or(false);
            let value = if is_sequence {
                format!("({})", value)
            } else {
                value.to_string()
            };
            if is_simple_identifier(key) {
                format!("{}: {}", key, value)
            } else {
                format!("{}: {}", quote(key), value)
            }
        })
        .collect();
    format!("{{ {} }}", props.join(", "))
}
