use std::collections::BTreeMap;
use std::ops::Range;

use crate::chain::Chain;

/// A node in the block program graph.
/// Statement blocks link to their successor through `next`; value blocks
/// hang off a parent's named input slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Identity used by hosts to highlight the block in diagnostics.
    pub id: String,
    /// Type tag selecting the generator function.
    pub kind: String,
    /// Literal field values, normalised to strings.
    pub fields: BTreeMap<String, String>,
    /// Value inputs. An absent slot means nothing is connected.
    pub inputs: BTreeMap<String, Block>,
    /// Statement inputs, each holding the head of a nested chain.
    pub statements: BTreeMap<String, Block>,
    /// The following statement in the sequence.
    pub next: Option<Box<Block>>,
    /// Byte span in source for error reporting.
    pub span: Range<usize>,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Block {
            id: id.into(),
            kind: kind.into(),
            fields: BTreeMap::new(),
            inputs: BTreeMap::new(),
            statements: BTreeMap::new(),
            next: None,
            span: 0..0,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_input(mut self, slot: impl Into<String>, block: Block) -> Self {
        self.inputs.insert(slot.into(), block);
        self
    }

    pub fn with_statement(mut self, slot: impl Into<String>, head: Block) -> Self {
        self.statements.insert(slot.into(), head);
        self
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = span;
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    pub fn input(&self, slot: &str) -> Option<&Block> {
        self.inputs.get(slot)
    }

    /// The nested statement chain connected at `slot`.
    pub fn statement(&self, slot: &str) -> Chain<'_> {
        Chain::new(self.statements.get(slot))
    }

    pub fn has_statement(&self, slot: &str) -> bool {
        self.statements.contains_key(slot)
    }

    /// This block followed by every block linked after it.
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(Some(self))
    }

    /// Link `blocks` into a chain in order and return its head.
    pub fn link(blocks: Vec<Block>) -> Option<Block> {
        blocks.into_iter().rev().fold(None, |next, mut block| {
            block.next = next.map(Box::new);
            Some(block)
        })
    }
}

// Unlinks the chain one block at a time so long programs don't recurse.
impl Drop for Block {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut block) = next {
            next = block.next.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_preserves_order() {
        let head = Block::link(vec![
            Block::new("a", "time_delay"),
            Block::new("b", "time_delay"),
            Block::new("c", "time_delay"),
        ])
        .unwrap();
        let ids: Vec<&str> = head.chain().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn link_empty_is_none() {
        assert!(Block::link(Vec::new()).is_none());
    }

    #[test]
    fn long_chain_drops_without_overflow() {
        let blocks = (0..200_000).map(|i| Block::new(format!("d{}", i), "time_delay")).collect();
        let head = Block::link(blocks).unwrap();
        assert_eq!(head.chain().count(), 200_000);
        drop(head);
    }

    #[test]
    fn missing_statement_slot_is_empty_chain() {
        let block = Block::new("if", "controls_if");
        assert!(block.statement("DO0").is_empty());
        assert!(block.input("IF0").is_none());
    }
}
