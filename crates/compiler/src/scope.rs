//! Lexical scope analysis over embedded script trees.
//!
//! The analysis runs in two passes. The first walks the `oxc_ast` tree in
//! document order, building the scope tree, recording declarations and
//! every identifier occurrence in a reference position. The second visits
//! the occurrences in reverse order, back-propagating each name into the
//! `references` set of its scope and all ancestors, and resolving it to
//! its owner scope or the global table. Visiting in reverse makes the
//! global table keep the first occurrence of each name.
//!
//! Scope boundaries: the root, every function (parameters and body share
//! one scope), block statements, `for`/`for-in`/`for-of` headers, one
//! scope per `switch` shared by all cases, and one per `catch` clause
//! shared by the parameter and the clause body.
//!
//! Member properties, non-computed keys, labels and module specifiers are
//! distinct node types in the tree, so they never count as references.
//! Declarator targets do, `a` in `const a = b` included.

use crate::{error::CompileResult, flags::DeclarationKind, js};
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrowFunctionExpression, AssignmentTarget, AssignmentTargetMaybeDefault,
    AssignmentTargetProperty, BindingPattern, BindingPatternKind, Class, ClassElement,
    Declaration as DeclarationNode, ExportDefaultDeclarationKind, Expression, ForStatementInit,
    ForStatementLeft, FormalParameters, Function, ImportDeclarationSpecifier, MemberExpression,
    ObjectPropertyKind, Program, PropertyKey, SimpleAssignmentTarget, Statement,
    VariableDeclaration, VariableDeclarationKind,
};
use oxc_span::Span;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// An identifier occurrence, with its span in the analyzed source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    fn new(name: &str, span: Span) -> Self {
        Self {
            name: name.to_string(),
            span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub node: Ident,
}

#[derive(Debug)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub is_block: bool,
    declarations: FxHashMap<String, Declaration>,
    /// names referenced in this scope or any descendant
    references: FxHashSet<String>,
    children: Vec<ScopeId>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, is_block: bool) -> Self {
        Self {
            parent,
            is_block,
            declarations: FxHashMap::default(),
            references: FxHashSet::default(),
            children: vec![],
        }
    }

    pub fn declarations(&self) -> &FxHashMap<String, Declaration> {
        &self.declarations
    }

    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    /// declared directly in this scope
    pub fn has(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    pub fn references(&self) -> &FxHashSet<String> {
        &self.references
    }

    pub fn is_referenced(&self, name: &str) -> bool {
        self.references.contains(name)
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub node: Ident,
    /// scope the occurrence sits in
    pub scope: ScopeId,
    /// declaring scope, `None` for globals
    pub owner: Option<ScopeId>,
    /// `a` in `{ a }`, where the name is both key and value
    pub shorthand: bool,
}

impl Reference {
    pub fn name(&self) -> &str {
        &self.node.name
    }
}

#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    references: Vec<Reference>,
    /// name -> index of its first unresolved occurrence
    globals: FxHashMap<String, usize>,
}

impl ScopeTree {
    /// Parses `source` as a module and analyzes it.
    pub fn analyze_program(source: &str) -> CompileResult<Self> {
        let allocator = Allocator::default();
        let program = js::parse_program(&allocator, source)?;
        Ok(Self::from_program(&program))
    }

    /// Parses `source` as a single expression and analyzes it.
    pub fn analyze_expression(source: &str) -> CompileResult<Self> {
        js::with_expression(source, Self::from_expression)
    }

    pub fn from_program(program: &Program<'_>) -> Self {
        let mut c = Collector::new();
        c.stmts(&program.body);
        c.finish()
    }

    pub fn from_expression(expr: &Expression<'_>) -> Self {
        let mut c = Collector::new();
        c.expr(expr);
        c.finish()
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn root_scope(&self) -> &Scope {
        self.get(self.root())
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn find_owner(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            if s.has(name) {
                return Some(id);
            }
            current = s.parent;
        }
        None
    }

    /// every reference occurrence, in document order
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// occurrences that no enclosing scope declares
    pub fn free_references(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| r.owner.is_none())
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    /// first occurrence of every global, in document order
    pub fn globals(&self) -> Vec<&Ident> {
        let mut indices: Vec<_> = self.globals.values().copied().collect();
        indices.sort_unstable();
        indices
            .into_iter()
            .map(|i| &self.references[i].node)
            .collect()
    }

    fn add_reference(&mut self, scope: ScopeId, name: &str) {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = &mut self.scopes[id.0];
            // an ancestor of a scope holding the name holds it too
            if s.references.contains(name) {
                break;
            }
            s.references.insert(name.to_string());
            current = s.parent;
        }
    }
}

struct Collector {
    scopes: Vec<Scope>,
    current: ScopeId,
    references: Vec<Reference>,
}

impl Collector {
    fn new() -> Self {
        Self {
            scopes: vec![Scope::new(None, false)],
            current: ScopeId(0),
            references: vec![],
        }
    }

    fn finish(self) -> ScopeTree {
        let mut tree = ScopeTree {
            scopes: self.scopes,
            references: self.references,
            globals: FxHashMap::default(),
        };
        for i in (0..tree.references.len()).rev() {
            let scope = tree.references[i].scope;
            let name = tree.references[i].node.name.clone();
            tree.add_reference(scope, &name);
            let owner = tree.find_owner(scope, &name);
            tree.references[i].owner = owner;
            if owner.is_none() {
                tree.globals.insert(name, i);
            }
        }
        trace!(
            scopes = tree.scopes.len(),
            references = tree.references.len(),
            globals = tree.globals.len(),
            "scope analysis done"
        );
        tree
    }

    fn with_scope<F>(&mut self, is_block: bool, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let parent = self.current;
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(Some(parent), is_block));
        self.scopes[parent.0].children.push(id);
        self.current = id;
        f(self);
        self.current = parent;
    }

    fn hoist_target(&self) -> ScopeId {
        let mut id = self.current;
        loop {
            let s = &self.scopes[id.0];
            match s.parent {
                Some(parent) if s.is_block => id = parent,
                _ => return id,
            }
        }
    }

    fn declare(&mut self, name: &str, span: Span, kind: DeclarationKind) {
        let target = if kind.is_hoisted() {
            self.hoist_target()
        } else {
            self.current
        };
        self.scopes[target.0]
            .declarations
            .entry(name.to_string())
            .or_insert_with(|| Declaration {
                kind,
                node: Ident::new(name, span),
            });
    }

    fn declare_pattern(&mut self, pattern: &BindingPattern<'_>, kind: DeclarationKind) {
        let mut ids = vec![];
        js::collect_bindings(pattern, &mut ids);
        for id in ids {
            self.declare(&id.name, id.span, kind);
        }
    }

    fn reference(&mut self, name: &str, span: Span, shorthand: bool) {
        self.references.push(Reference {
            node: Ident::new(name, span),
            scope: self.current,
            owner: None,
            shorthand,
        });
    }

    /// Walks defaults and computed keys of a binding pattern. The bound
    /// names themselves are recorded only for declarator targets.
    fn pattern(&mut self, pattern: &BindingPattern<'_>, record_targets: bool) {
        match &pattern.kind {
            BindingPatternKind::BindingIdentifier(id) => {
                if record_targets {
                    self.reference(&id.name, id.span, false);
                }
            }
            BindingPatternKind::ObjectPattern(obj) => {
                for prop in obj.properties.iter() {
                    if prop.computed {
                        self.property_key(&prop.key);
                    }
                    self.pattern(&prop.value, record_targets);
                }
                if let Some(rest) = &obj.rest {
                    self.pattern(&rest.argument, record_targets);
                }
            }
            BindingPatternKind::ArrayPattern(arr) => {
                for elem in arr.elements.iter().flatten() {
                    self.pattern(elem, record_targets);
                }
                if let Some(rest) = &arr.rest {
                    self.pattern(&rest.argument, record_targets);
                }
            }
            BindingPatternKind::AssignmentPattern(assign) => {
                self.pattern(&assign.left, record_targets);
                self.expr(&assign.right);
            }
        }
    }

    fn property_key(&mut self, key: &PropertyKey<'_>) {
        if let Some(e) = key.as_expression() {
            self.expr(e);
        }
    }

    fn params(&mut self, params: &FormalParameters<'_>) {
        for param in params.items.iter() {
            self.declare_pattern(&param.pattern, DeclarationKind::Param);
            self.pattern(&param.pattern, false);
        }
        if let Some(rest) = &params.rest {
            self.declare_pattern(&rest.argument, DeclarationKind::Param);
            self.pattern(&rest.argument, false);
        }
    }

    fn function(&mut self, f: &Function<'_>, declare_own_name: bool) {
        self.with_scope(false, |s| {
            if let (Some(id), true) = (&f.id, declare_own_name) {
                s.declare(&id.name, id.span, DeclarationKind::Function);
            }
            s.params(&f.params);
            if let Some(body) = &f.body {
                s.stmts(&body.statements);
            }
        });
    }

    fn arrow(&mut self, a: &ArrowFunctionExpression<'_>) {
        self.with_scope(false, |s| {
            s.params(&a.params);
            s.stmts(&a.body.statements);
        });
    }

    fn class(&mut self, c: &Class<'_>) {
        if let Some(sup) = &c.super_class {
            self.expr(sup);
        }
        for element in c.body.body.iter() {
            match element {
                ClassElement::MethodDefinition(m) => {
                    if m.computed {
                        self.property_key(&m.key);
                    }
                    self.function(&m.value, false);
                }
                ClassElement::PropertyDefinition(p) => {
                    if p.computed {
                        self.property_key(&p.key);
                    }
                    if let Some(v) = &p.value {
                        self.expr(v);
                    }
                }
                ClassElement::AccessorProperty(p) => {
                    if p.computed {
                        self.property_key(&p.key);
                    }
                    if let Some(v) = &p.value {
                        self.expr(v);
                    }
                }
                ClassElement::StaticBlock(b) => self.with_scope(true, |s| s.stmts(&b.body)),
                ClassElement::TSIndexSignature(_) => (),
            }
        }
    }

    fn var_decl(&mut self, decl: &VariableDeclaration<'_>) {
        let kind = match decl.kind {
            VariableDeclarationKind::Var => DeclarationKind::Var,
            VariableDeclarationKind::Let => DeclarationKind::Let,
            VariableDeclarationKind::Const
            | VariableDeclarationKind::Using
            | VariableDeclarationKind::AwaitUsing => DeclarationKind::Const,
        };
        for d in decl.declarations.iter() {
            self.declare_pattern(&d.id, kind);
            self.pattern(&d.id, true);
            if let Some(init) = &d.init {
                self.expr(init);
            }
        }
    }

    fn declaration(&mut self, decl: &DeclarationNode<'_>) {
        match decl {
            DeclarationNode::VariableDeclaration(d) => self.var_decl(d),
            DeclarationNode::FunctionDeclaration(f) => self.function_declaration(f),
            DeclarationNode::ClassDeclaration(c) => self.class_declaration(c),
            _ => (),
        }
    }

    fn function_declaration(&mut self, f: &Function<'_>) {
        if let Some(id) = &f.id {
            self.declare(&id.name, id.span, DeclarationKind::Function);
        }
        self.function(f, false);
    }

    fn class_declaration(&mut self, c: &Class<'_>) {
        if let Some(id) = &c.id {
            self.declare(&id.name, id.span, DeclarationKind::Class);
        }
        self.class(c);
    }

    fn stmts(&mut self, stmts: &[Statement<'_>]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Statement<'_>) {
        use Statement as S;
        match stmt {
            S::ExpressionStatement(s) => self.expr(&s.expression),
            S::ThrowStatement(s) => self.expr(&s.argument),
            S::ReturnStatement(s) => {
                if let Some(arg) = &s.argument {
                    self.expr(arg);
                }
            }
            S::VariableDeclaration(d) => self.var_decl(d),
            S::FunctionDeclaration(f) => self.function_declaration(f),
            S::ClassDeclaration(c) => self.class_declaration(c),
            S::IfStatement(s) => {
                self.expr(&s.test);
                self.stmt(&s.consequent);
                if let Some(alt) = &s.alternate {
                    self.stmt(alt);
                }
            }
            S::BlockStatement(b) => self.with_scope(true, |s| s.stmts(&b.body)),
            S::ForStatement(f) => self.with_scope(true, |s| {
                match &f.init {
                    Some(ForStatementInit::VariableDeclaration(d)) => s.var_decl(d),
                    Some(init) => {
                        if let Some(e) = init.as_expression() {
                            s.expr(e);
                        }
                    }
                    None => (),
                }
                if let Some(test) = &f.test {
                    s.expr(test);
                }
                if let Some(update) = &f.update {
                    s.expr(update);
                }
                s.stmt(&f.body);
            }),
            S::ForInStatement(f) => self.with_scope(true, |s| {
                s.for_left(&f.left);
                s.expr(&f.right);
                s.stmt(&f.body);
            }),
            S::ForOfStatement(f) => self.with_scope(true, |s| {
                s.for_left(&f.left);
                s.expr(&f.right);
                s.stmt(&f.body);
            }),
            S::WhileStatement(w) => {
                self.expr(&w.test);
                self.stmt(&w.body);
            }
            S::DoWhileStatement(w) => {
                self.stmt(&w.body);
                self.expr(&w.test);
            }
            S::SwitchStatement(sw) => {
                self.expr(&sw.discriminant);
                self.with_scope(true, |s| {
                    for case in sw.cases.iter() {
                        if let Some(test) = &case.test {
                            s.expr(test);
                        }
                        s.stmts(&case.consequent);
                    }
                });
            }
            S::TryStatement(t) => {
                self.with_scope(true, |s| s.stmts(&t.block.body));
                if let Some(handler) = &t.handler {
                    self.with_scope(true, |s| {
                        if let Some(param) = &handler.param {
                            s.declare_pattern(&param.pattern, DeclarationKind::Catch);
                            s.pattern(&param.pattern, false);
                        }
                        s.stmts(&handler.body.body);
                    });
                }
                if let Some(finalizer) = &t.finalizer {
                    self.with_scope(true, |s| s.stmts(&finalizer.body));
                }
            }
            S::LabeledStatement(l) => self.stmt(&l.body),
            S::WithStatement(w) => {
                self.expr(&w.object);
                self.stmt(&w.body);
            }
            S::ImportDeclaration(import) => {
                for specifier in import.specifiers.iter().flatten() {
                    let local = match specifier {
                        ImportDeclarationSpecifier::ImportSpecifier(s) => &s.local,
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => &s.local,
                    };
                    self.declare(&local.name, local.span, DeclarationKind::Import);
                }
            }
            S::ExportNamedDeclaration(export) => {
                if let Some(decl) = &export.declaration {
                    self.declaration(decl);
                }
            }
            S::ExportDefaultDeclaration(export) => match &export.declaration {
                ExportDefaultDeclarationKind::FunctionDeclaration(f) => {
                    self.function_declaration(f)
                }
                ExportDefaultDeclarationKind::ClassDeclaration(c) => self.class_declaration(c),
                other => {
                    if let Some(e) = other.as_expression() {
                        self.expr(e);
                    }
                }
            },
            _ => (),
        }
    }

    fn for_left(&mut self, left: &ForStatementLeft<'_>) {
        match left {
            ForStatementLeft::VariableDeclaration(d) => self.var_decl(d),
            other => {
                if let Some(target) = other.as_assignment_target() {
                    self.assignment_target(target);
                }
            }
        }
    }

    fn member(&mut self, m: &MemberExpression<'_>) {
        match m {
            MemberExpression::ComputedMemberExpression(m) => {
                self.expr(&m.object);
                self.expr(&m.expression);
            }
            MemberExpression::StaticMemberExpression(m) => self.expr(&m.object),
            MemberExpression::PrivateFieldExpression(m) => self.expr(&m.object),
        }
    }

    fn simple_target(&mut self, target: &SimpleAssignmentTarget<'_>) {
        match target {
            SimpleAssignmentTarget::AssignmentTargetIdentifier(id) => {
                self.reference(&id.name, id.span, false)
            }
            other => {
                if let Some(m) = other.as_member_expression() {
                    self.member(m);
                }
            }
        }
    }

    fn assignment_target(&mut self, target: &AssignmentTarget<'_>) {
        match target {
            AssignmentTarget::ArrayAssignmentTarget(arr) => {
                for elem in arr.elements.iter().flatten() {
                    self.target_maybe_default(elem);
                }
                if let Some(rest) = &arr.rest {
                    self.assignment_target(&rest.target);
                }
            }
            AssignmentTarget::ObjectAssignmentTarget(obj) => {
                for prop in obj.properties.iter() {
                    match prop {
                        AssignmentTargetProperty::AssignmentTargetPropertyIdentifier(p) => {
                            self.reference(&p.binding.name, p.binding.span, true);
                            if let Some(init) = &p.init {
                                self.expr(init);
                            }
                        }
                        AssignmentTargetProperty::AssignmentTargetPropertyProperty(p) => {
                            if p.computed {
                                self.property_key(&p.name);
                            }
                            self.target_maybe_default(&p.binding);
                        }
                    }
                }
                if let Some(rest) = &obj.rest {
                    self.assignment_target(&rest.target);
                }
            }
            other => {
                if let Some(simple) = other.as_simple_assignment_target() {
                    self.simple_target(simple);
                }
            }
        }
    }

    fn target_maybe_default(&mut self, target: &AssignmentTargetMaybeDefault<'_>) {
        match target {
            AssignmentTargetMaybeDefault::AssignmentTargetWithDefault(t) => {
                self.assignment_target(&t.binding);
                self.expr(&t.init);
            }
            other => {
                if let Some(t) = other.as_assignment_target() {
                    self.assignment_target(t);
                }
            }
        }
    }

    fn expr(&mut self, expr: &Expression<'_>) {
        use Expression as E;
        match expr {
            E::Identifier(id) => self.reference(&id.name, id.span, false),
            E::TemplateLiteral(t) => {
                for e in t.expressions.iter() {
                    self.expr(e);
                }
            }
            E::TaggedTemplateExpression(t) => {
                self.expr(&t.tag);
                for e in t.quasi.expressions.iter() {
                    self.expr(e);
                }
            }
            E::ArrayExpression(arr) => {
                for elem in arr.elements.iter() {
                    if let Some(e) = elem.as_expression() {
                        self.expr(e);
                    } else if let oxc_ast::ast::ArrayExpressionElement::SpreadElement(s) = elem {
                        self.expr(&s.argument);
                    }
                }
            }
            E::ObjectExpression(obj) => {
                for prop in obj.properties.iter() {
                    match prop {
                        ObjectPropertyKind::ObjectProperty(p) if p.shorthand => {
                            if let E::Identifier(id) = &p.value {
                                self.reference(&id.name, id.span, true);
                            }
                        }
                        ObjectPropertyKind::ObjectProperty(p) => {
                            if p.computed {
                                self.property_key(&p.key);
                            }
                            self.expr(&p.value);
                        }
                        ObjectPropertyKind::SpreadProperty(s) => self.expr(&s.argument),
                    }
                }
            }
            E::FunctionExpression(f) => self.function(f, true),
            E::ArrowFunctionExpression(a) => self.arrow(a),
            E::ClassExpression(c) => self.class(c),
            E::UnaryExpression(u) => self.expr(&u.argument),
            E::UpdateExpression(u) => self.simple_target(&u.argument),
            E::AwaitExpression(a) => self.expr(&a.argument),
            E::ParenthesizedExpression(p) => self.expr(&p.expression),
            E::BinaryExpression(b) => {
                self.expr(&b.left);
                self.expr(&b.right);
            }
            E::LogicalExpression(l) => {
                self.expr(&l.left);
                self.expr(&l.right);
            }
            E::PrivateInExpression(p) => self.expr(&p.right),
            E::AssignmentExpression(a) => {
                self.assignment_target(&a.left);
                self.expr(&a.right);
            }
            E::ConditionalExpression(c) => {
                self.expr(&c.test);
                self.expr(&c.consequent);
                self.expr(&c.alternate);
            }
            E::CallExpression(c) => {
                self.expr(&c.callee);
                self.arguments(&c.arguments);
            }
            E::NewExpression(n) => {
                self.expr(&n.callee);
                self.arguments(&n.arguments);
            }
            E::ChainExpression(c) => match &c.expression {
                oxc_ast::ast::ChainElement::CallExpression(call) => {
                    self.expr(&call.callee);
                    self.arguments(&call.arguments);
                }
                other => {
                    if let Some(m) = other.as_member_expression() {
                        self.member(m);
                    }
                }
            },
            E::SequenceExpression(s) => {
                for e in s.expressions.iter() {
                    self.expr(e);
                }
            }
            E::YieldExpression(y) => {
                if let Some(arg) = &y.argument {
                    self.expr(arg);
                }
            }
            E::ImportExpression(i) => self.expr(&i.source),
            other => {
                if let Some(m) = other.as_member_expression() {
                    self.member(m);
                }
            }
        }
    }

    fn arguments(&mut self, args: &[oxc_ast::ast::Argument<'_>]) {
        for arg in args {
            if let Some(e) = arg.as_expression() {
                self.expr(e);
            } else if let oxc_ast::ast::Argument::SpreadElement(s) = arg {
                self.expr(&s.argument);
            }
        }
    }
}
