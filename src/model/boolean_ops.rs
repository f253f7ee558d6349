//! Boolean Operations extension types

/// Boolean operation type for volumetric modeling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOpType {
    /// Difference - subtract the operands from the base
    Difference,
}

impl BooleanOpType {
    /// Convert operation type to its XML attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanOpType::Difference => "difference",
        }
    }
}

/// A single boolean operand
///
/// Operand placements are baked into the operand mesh, so no transform is
/// written.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanRef {
    /// ID of the mesh object used as operand
    pub objectid: usize,
}

impl BooleanRef {
    /// Create a new boolean reference
    pub fn new(objectid: usize) -> Self {
        Self { objectid }
    }
}

/// Boolean shape definition
///
/// The operands are applied to the base object in order.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanShape {
    /// The base object ID
    pub objectid: usize,
    /// The boolean operation to perform
    pub operation: BooleanOpType,
    /// List of operand objects
    pub operands: Vec<BooleanRef>,
}

impl BooleanShape {
    /// Create a new boolean shape
    pub fn new(objectid: usize, operation: BooleanOpType) -> Self {
        Self {
            objectid,
            operation,
            operands: Vec::new(),
        }
    }
}
