// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Output of a successful check: resolved symbols and node types.

use std::collections::HashMap;

use ula_ast::{NodeId, Type};

/// Where a variable lives in the function frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    /// Passed on the stack, above the saved frame pointer.
    Param,
    /// Reserved on the stack, below the frame pointer.
    Local,
}

/// A resolved variable: its type and its slot in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub ty: Type,
    pub storage: StorageClass,
    /// IX-relative displacement of the value byte.
    pub offset: i16,
}

/// A function's type signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnSig {
    pub params: Vec<Type>,
    pub ret: Type,
}

/// Stack frame dimensions for one function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameLayout {
    pub param_count: usize,
    pub local_count: usize,
}

/// A fully checked program, ready for code generation.
#[derive(Debug, Default)]
pub struct TypedProgram {
    /// Type of every expression node.
    pub node_types: HashMap<NodeId, Type>,
    /// Resolved symbol for every name-carrying node (idents, lets, assigns).
    pub resolutions: HashMap<NodeId, Symbol>,
    /// Signature of every user function.
    pub signatures: HashMap<String, FnSig>,
    /// Frame layout of every user function.
    pub frames: HashMap<String, FrameLayout>,
}

impl TypedProgram {
    /// Type recorded for a node.
    pub fn type_of(&self, id: NodeId) -> Option<Type> {
        self.node_types.get(&id).copied()
    }

    /// Symbol recorded for a node.
    pub fn symbol_of(&self, id: NodeId) -> Option<Symbol> {
        self.resolutions.get(&id).copied()
    }
}
