// Prefixes free identifiers of template expressions so the generated
// code can reach them, e.g. `count + 1` becomes `_ctx.count + 1`.
// Names introduced by the template itself (`{#each}` context) and
// allow-listed globals stay as they are.
use super::TransformContext;
use crate::{
    error::CompileResult,
    flags::BindingTypes,
    ir::SimpleExpression,
    scope::{Reference, ScopeTree},
    util::is_global_allow_listed,
};

impl<'c> TransformContext<'c> {
    pub fn process_expression(&self, mut exp: SimpleExpression) -> CompileResult<SimpleExpression> {
        if !self.options.prefix_identifiers || exp.is_static {
            return Ok(exp);
        }
        let tree = ScopeTree::analyze_expression(&exp.content)
            .map_err(|e| e.with_location(exp.location.clone()))?;
        if let Some(content) = self.prefix_identifiers(&exp.content, &tree) {
            exp.location.source = content.clone();
            exp.content = content;
        }
        Ok(exp)
    }

    /// Source with free identifiers rewritten in place, `None` when
    /// nothing needs a prefix.
    fn prefix_identifiers(&self, source: &str, tree: &ScopeTree) -> Option<String> {
        let mut targets: Vec<&Reference> = tree
            .free_references()
            .filter(|r| !self.unit.is_identifier(r.name()) && !is_global_allow_listed(r.name()))
            .collect();
        if targets.is_empty() {
            return None;
        }
        targets.sort_by_key(|r| r.node.span.start);
        let mut out = String::with_capacity(source.len() + targets.len() * 5);
        let mut last = 0;
        for r in targets {
            let (start, end) = (r.node.span.start as usize, r.node.span.end as usize);
            out.push_str(&source[last..start]);
            // `{ a }` has to keep its key
            if r.shorthand {
                out.push_str(r.name());
                out.push_str(": ");
            }
            out.push_str(&self.rewrite_identifier(r.name()));
            last = end;
        }
        out.push_str(&source[last..]);
        Some(out)
    }

    fn rewrite_identifier(&self, name: &str) -> String {
        use BindingTypes::*;
        let binding = self.options.binding_metadata.get(name).copied();
        if !self.options.inline {
            let prefix = match binding {
                Some(Data) => "$data.",
                Some(Props) => "$props.",
                Some(Options) => "$options.",
                Some(_) => "$setup.",
                None => "_ctx.",
            };
            return format!("{}{}", prefix, name);
        }
        match binding {
            Some(SetupConst) => name.to_string(),
            Some(SetupRef) => format!("{}.value", name),
            Some(SetupMaybeRef) | Some(SetupLet) => format!("_unref({})", name),
            Some(Props) => format!("__props.{}", name),
            _ => format!("_ctx.{}", name),
        }
    }
}
