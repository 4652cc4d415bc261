//! This module defines flags and small classification enums shared by
//! the analyzer, the transforms and the IR.

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::Serialize;

bitflags! {
    /// Describes how a node is materialized at runtime.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct DynamicFlag: u8 {
        /// the node needs a runtime handle (it owns an id)
        const REFERENCED   = 1 << 0;
        /// the node is absent from the literal template text
        const NON_TEMPLATE = 1 << 1;
        /// the node is created and inserted imperatively
        const INSERT       = 1 << 2;
    }
}

/// How a name was declared in a lexical scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Param,
    Catch,
    Import,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        use DeclarationKind::*;
        match self {
            Var => "var",
            Let => "let",
            Const => "const",
            Function => "function",
            Class => "class",
            Param => "param",
            Catch => "catch",
            Import => "import",
        }
    }

    /// var-like declarations hoist to the nearest function scope.
    pub fn is_hoisted(&self) -> bool {
        matches!(self, DeclarationKind::Var)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum BindingTypes {
    /// returned from data()
    Data,
    /// declared as a prop
    Props,
    /// a let binding (may or may not be a ref)
    SetupLet,
    ///a const binding that can never be a ref.
    ///these bindings don't need `unref()` calls when processed in inlined
    ///template expressions.
    SetupConst,
    /// a const binding that may be a ref.
    SetupMaybeRef,
    /// bindings that are guaranteed to be refs
    SetupRef,
    /// declared by other options, e.g. computed, inject
    Options,
}

impl BindingTypes {
    pub fn is_setup(&self) -> bool {
        use BindingTypes::*;
        matches!(self, SetupLet | SetupConst | SetupMaybeRef | SetupRef)
    }
}
