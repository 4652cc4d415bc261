use crate::{
    ast::{Element, TemplateNode},
    compiler::CompileOption,
    error::CompileResult,
    flags::DynamicFlag,
    ir::{is_same_expressions, BlockIR, DynamicInfo, Effect, IRSlot, Operation, SimpleExpression},
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::{borrow::Cow, cell::Cell};

use super::transform_node;

/// State shared by every context of one compile call.
#[derive(Default, Debug)]
pub struct CompileUnit {
    next_id: usize,
    /// deduplicated literal templates
    pub template: Vec<String>,
    pub components: FxHashSet<String>,
    pub directives: FxHashSet<String>,
    /// template-scope names, e.g. `{#each}` context, with their shadow count
    pub identifiers: FxHashMap<String, usize>,
    /// depth of enclosing `{#each}` blocks
    pub in_for: usize,
}

impl CompileUnit {
    pub fn allocate_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Index of `text` in the template table, appended when new.
    pub fn push_template(&mut self, text: &str) -> usize {
        if let Some(i) = self.template.iter().position(|t| t == text) {
            return i;
        }
        self.template.push(text.to_string());
        self.template.len() - 1
    }

    pub fn is_identifier(&self, name: &str) -> bool {
        self.identifiers.get(name).map_or(false, |&n| n > 0)
    }

    fn add_identifiers(&mut self, names: &[String]) {
        for name in names {
            *self.identifiers.entry(name.clone()).or_default() += 1;
        }
    }

    fn remove_identifiers(&mut self, names: &[String]) {
        for name in names {
            if let Some(n) = self.identifiers.get_mut(name) {
                *n -= 1;
            }
        }
    }
}

/// What a child context may see of its parent.
pub struct ParentFrame<'c> {
    /// tag of the parent element, `None` for fragments
    pub tag: Option<&'c str>,
    pub children: &'c [TemplateNode],
    /// children before this index were consumed by an earlier sibling
    pub consumed_until: Cell<usize>,
}

impl<'c> ParentFrame<'c> {
    pub fn new(node: &'c TemplateNode, consumed: usize) -> Self {
        Self {
            tag: node.get_element().map(|e| e.name.as_str()),
            children: node.children(),
            consumed_until: Cell::new(consumed),
        }
    }

    pub fn consume_until(&self, end: usize) {
        if end > self.consumed_until.get() {
            self.consumed_until.set(end);
        }
    }
}

/// Per-node accumulator. Child contexts reborrow the block and the
/// compile unit of their parent and start with empty buffers.
pub struct TransformContext<'c> {
    pub node: Cow<'c, TemplateNode>,
    pub parent: Option<&'c ParentFrame<'c>>,
    pub index: usize,
    /// root of the compile call or of a block; registers its template on exit
    pub is_block_root: bool,
    pub block: &'c mut BlockIR,
    pub unit: &'c mut CompileUnit,
    pub options: &'c CompileOption,
    /// literal template text of this subtree
    pub template: String,
    pub children_template: Vec<String>,
    pub dynamic: DynamicInfo,
    /// slots collected for a component
    pub slots: Vec<IRSlot>,
    /// number of leading children already handled by this node
    pub consumed_children: usize,
    pub removed: bool,
}

impl<'c> TransformContext<'c> {
    pub fn new_root(
        node: &'c TemplateNode,
        block: &'c mut BlockIR,
        unit: &'c mut CompileUnit,
        options: &'c CompileOption,
    ) -> Self {
        Self::with_node(Cow::Borrowed(node), None, 0, block, unit, options, true)
    }

    fn with_node(
        node: Cow<'c, TemplateNode>,
        parent: Option<&'c ParentFrame<'c>>,
        index: usize,
        block: &'c mut BlockIR,
        unit: &'c mut CompileUnit,
        options: &'c CompileOption,
        is_block_root: bool,
    ) -> Self {
        Self {
            node,
            parent,
            index,
            is_block_root,
            block,
            unit,
            options,
            template: String::new(),
            children_template: vec![],
            dynamic: DynamicInfo::default(),
            slots: vec![],
            consumed_children: 0,
            removed: false,
        }
    }

    /// Derives the context of `child`. Shared state is reborrowed,
    /// per-node accumulators start empty.
    pub fn create<'p>(
        &'p mut self,
        child: &'p TemplateNode,
        index: usize,
        frame: &'p ParentFrame<'p>,
    ) -> TransformContext<'p> {
        TransformContext::with_node(
            Cow::Borrowed(child),
            Some(frame),
            index,
            &mut *self.block,
            &mut *self.unit,
            self.options,
            false,
        )
    }

    /// Transforms `node` into a new block, e.g. a branch or a loop body.
    pub fn create_block(&mut self, node: TemplateNode) -> CompileResult<BlockIR> {
        let mut block = BlockIR::new(TemplateNode::default());
        let (node, dynamic) = {
            let mut ctx = TransformContext::with_node(
                Cow::Owned(node),
                None,
                0,
                &mut block,
                &mut *self.unit,
                self.options,
                true,
            );
            ctx.reference();
            transform_node(&mut ctx)?;
            (ctx.node.into_owned(), ctx.dynamic)
        };
        block.node = node;
        block.dynamic = dynamic;
        Ok(block)
    }

    /// Runs `f` with `names` visible as template-scope identifiers.
    pub fn with_identifiers<T, F>(&mut self, names: &[String], f: F) -> CompileResult<T>
    where
        F: FnOnce(&mut Self) -> CompileResult<T>,
    {
        self.unit.add_identifiers(names);
        let ret = f(self);
        self.unit.remove_identifiers(names);
        ret
    }

    pub fn element(&self) -> Option<&Element> {
        self.node.get_element()
    }

    /// Marks the node as needing a runtime handle. Idempotent.
    pub fn reference(&mut self) -> usize {
        if let Some(id) = self.dynamic.id {
            return id;
        }
        self.dynamic.flags |= DynamicFlag::REFERENCED;
        let id = self.unit.allocate_id();
        self.dynamic.id = Some(id);
        id
    }

    pub fn allocate_id(&mut self) -> usize {
        self.unit.allocate_id()
    }

    pub fn register_operation(&mut self, op: Operation) {
        self.block.operations.push(op);
    }

    /// Registers `op` to re-run whenever one of `expressions` changes.
    /// Constant expressions are dropped; an effect over the same
    /// expressions is reused.
    pub fn register_effect(&mut self, expressions: Vec<SimpleExpression>, op: Operation) {
        let expressions: Vec<_> = expressions
            .into_iter()
            .filter(|e| !e.is_constant())
            .collect();
        if expressions.is_empty() {
            return self.register_operation(op);
        }
        let effects = &mut self.block.effects;
        match effects
            .iter_mut()
            .find(|e| is_same_expressions(&e.expressions, &expressions))
        {
            Some(existing) => existing.operations.push(op),
            None => effects.push(Effect {
                expressions,
                operations: vec![op],
            }),
        }
    }

    pub fn push_template(&mut self, text: &str) -> usize {
        self.unit.push_template(text)
    }

    /// Records the accumulated template of this node in the table.
    pub fn register_template(&mut self) -> Option<usize> {
        if self.template.is_empty() {
            return None;
        }
        let id = self.unit.push_template(&self.template);
        self.dynamic.template = Some(id);
        Some(id)
    }

    pub fn replace_node(&mut self, node: TemplateNode) {
        self.node = Cow::Owned(node);
    }

    pub fn remove_node(&mut self) {
        self.removed = true;
    }

    pub fn is_in_for(&self) -> bool {
        self.unit.in_for > 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn new_block() -> BlockIR {
        BlockIR::new(TemplateNode::default())
    }

    #[test]
    fn test_template_dedup() {
        let mut unit = CompileUnit::default();
        let a = unit.push_template("<div></div>");
        let b = unit.push_template("<span></span>");
        assert_eq!(unit.push_template("<div></div>"), a);
        assert_ne!(a, b);
        assert_eq!(unit.template.len(), 2);
    }

    #[test]
    fn test_reference_idempotent() {
        let node = TemplateNode::default();
        let option = CompileOption::default();
        let (mut block, mut unit) = (new_block(), CompileUnit::default());
        let mut ctx = TransformContext::new_root(&node, &mut block, &mut unit, &option);
        let id = ctx.reference();
        assert_eq!(ctx.reference(), id);
        assert!(ctx.dynamic.flags.contains(DynamicFlag::REFERENCED));
        assert_eq!(ctx.allocate_id(), id + 1);
    }

    #[test]
    fn test_effect_coalescing() {
        let node = TemplateNode::default();
        let option = CompileOption::default();
        let (mut block, mut unit) = (new_block(), CompileUnit::default());
        let mut ctx = TransformContext::new_root(&node, &mut block, &mut unit, &option);
        let exp = |name: &str| SimpleExpression::dynamic(name, Default::default());
        let text = |element, name| Operation::SetText {
            element,
            values: vec![exp(name)],
        };
        ctx.register_effect(vec![exp("a")], text(0, "a"));
        ctx.register_effect(vec![exp("a")], text(1, "a"));
        ctx.register_effect(vec![exp("b")], text(2, "b"));
        let constant = SimpleExpression::new_static("x", Default::default());
        let op = Operation::SetText {
            element: 3,
            values: vec![constant.clone()],
        };
        ctx.register_effect(vec![constant], op);
        assert_eq!(block.effects.len(), 2);
        assert_eq!(block.effects[0].operations.len(), 2);
        assert_eq!(block.effects[1].operations.len(), 1);
        assert_eq!(block.operations.len(), 1);
    }

    #[test]
    fn test_template_scope_identifiers() {
        let node = TemplateNode::default();
        let option = CompileOption::default();
        let (mut block, mut unit) = (new_block(), CompileUnit::default());
        let mut ctx = TransformContext::new_root(&node, &mut block, &mut unit, &option);
        let names = vec!["item".to_string()];
        let seen = ctx
            .with_identifiers(&names, |ctx| Ok(ctx.unit.is_identifier("item")))
            .unwrap();
        assert!(seen);
        assert!(!ctx.unit.is_identifier("item"));
    }
}
