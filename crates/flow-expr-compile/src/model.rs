//! Collaborator model: the slices of the surrounding editor the
//! expression pipeline actually needs.
//!
//! The real editor wraps these in a much larger document model; the
//! checker and compiler only see named bindings and, at build time, the
//! asset allocator and output buffer.

use flow_expr_ast::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Expression source as stored on a component property: absent, an
/// already-literal number, or text to parse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpressionSource<'a> {
    Empty,
    Number(f64),
    Text(&'a str),
}

impl<'a> From<&'a str> for ExpressionSource<'a> {
    fn from(text: &'a str) -> Self {
        ExpressionSource::Text(text)
    }
}

impl From<f64> for ExpressionSource<'_> {
    fn from(n: f64) -> Self {
        ExpressionSource::Number(n)
    }
}

/// A flow component: the binding context for identifier resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Component {
    /// Declared input names, in wire order.
    pub inputs: Vec<String>,
}

/// The flow graph a component belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Flow {
    /// Local variable names, in wire order.
    pub local_variables: Vec<String>,
}

/// An enum definition: member name to numeric value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumDef {
    pub members: IndexMap<String, f64>,
}

/// The project: global bindings and enum tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    /// Global variable names, in wire order.
    pub global_variables: Vec<String>,
    /// Enum definitions by name.
    pub enums: IndexMap<String, EnumDef>,
}

/// Per-call resolution bundle for checking and compiling.
#[derive(Debug, Clone, Copy)]
pub struct ExprContext<'a> {
    pub component: &'a Component,
    pub flow: &'a Flow,
    pub project: &'a Project,
}

/// Build-time allocator: interns constants and resolves bindings to
/// instruction operands.
///
/// Owned exclusively by one build pass; concurrent builds use
/// independent instances.
#[derive(Debug)]
pub struct Assets<'a> {
    pub root_project: &'a Project,
    /// Global variable pool, in slot order. Seeded from the project but
    /// owned here: the build pipeline may append synthetic globals.
    pub global_variables: Vec<String>,
    constants: Vec<Value>,
}

impl<'a> Assets<'a> {
    /// Create an allocator with the project's globals as the initial
    /// variable pool.
    pub fn new(root_project: &'a Project) -> Self {
        Self {
            root_project,
            global_variables: root_project.global_variables.clone(),
            constants: Vec::new(),
        }
    }

    /// Intern a value into the constant pool, reusing the slot of a
    /// structurally equal value.
    pub fn get_constant_index(&mut self, value: &Value) -> usize {
        if let Some(index) = self.constants.iter().position(|v| v == value) {
            return index;
        }
        self.constants.push(value.clone());
        self.constants.len() - 1
    }

    /// Ordinal of a component input by name.
    pub fn find_component_input_index(&self, component: &Component, name: &str) -> Option<usize> {
        component.inputs.iter().position(|input| input == name)
    }

    /// Slot of a global variable by name.
    pub fn find_global_variable_index(&self, name: &str) -> Option<usize> {
        self.global_variables.iter().position(|var| var == name)
    }

    /// The finished constant pool.
    pub fn constants(&self) -> &[Value] {
        &self.constants
    }
}

/// Append-only byte sink for compiled instruction streams.
#[derive(Debug, Default)]
pub struct DataBuffer {
    data: Vec<u8>,
}

impl DataBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one 16-bit word, little-endian, without alignment padding.
    pub fn write_uint16_non_aligned(&mut self, word: u16) {
        self.data.extend_from_slice(&word.to_le_bytes());
    }

    /// Raw bytes written so far.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Decode the buffer back into 16-bit words.
    ///
    /// A trailing odd byte is dropped; the expression compiler only ever
    /// writes whole words.
    pub fn words(&self) -> Vec<u16> {
        self.data
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }
}
