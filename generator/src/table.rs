use std::collections::HashMap;

use blocks::block::Block;

use crate::error::Result;
use crate::library;
use crate::order::OrderedCode;
use crate::pass::GenerationPass;

/// Generator for a block that produces a value.
pub type ValueFn = fn(&Block, &mut GenerationPass<'_>) -> Result<OrderedCode>;

/// Generator for a block that forms a statement. The returned text ends in a newline.
pub type StatementFn = fn(&Block, &mut GenerationPass<'_>) -> Result<String>;

#[derive(Clone, Copy)]
pub enum BlockGenerator {
    Value(ValueFn),
    Statement(StatementFn),
}

/// Maps block type tags to generator functions.
#[derive(Clone, Default)]
pub struct GeneratorTable {
    generators: HashMap<String, BlockGenerator>,
}

impl GeneratorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding every block in the built-in library.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        library::register_builtins(&mut table);
        table
    }

    /// Register a value generator. Replaces any generator for the same tag.
    pub fn register_value(&mut self, block_type: impl Into<String>, generator: ValueFn) {
        self.generators
            .insert(block_type.into(), BlockGenerator::Value(generator));
    }

    /// Register a statement generator. Replaces any generator for the same tag.
    pub fn register_statement(&mut self, block_type: impl Into<String>, generator: StatementFn) {
        self.generators
            .insert(block_type.into(), BlockGenerator::Statement(generator));
    }

    pub fn get(&self, block_type: &str) -> Option<BlockGenerator> {
        self.generators.get(block_type).copied()
    }

    pub fn contains(&self, block_type: &str) -> bool {
        self.generators.contains_key(block_type)
    }

    /// Registered type tags, sorted.
    pub fn block_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.generators.keys().map(|s| s.as_str()).collect();
        types.sort_unstable();
        types
    }
}
