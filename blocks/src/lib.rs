pub mod block;
pub mod board;
pub mod chain;
pub mod parser;

use crate::block::Block;
use crate::chain::Chain;

/// A parsed block program.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Board requested by the document itself, if any.
    pub board: Option<String>,
    /// Head of the statement chain that runs once, inside `setup()`.
    pub setup: Option<Block>,
    /// Head of the statement chain that forms the main routine.
    pub main: Option<Block>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl Program {
    /// Statements of the one-time setup chain, in link order.
    pub fn setup_chain(&self) -> Chain<'_> {
        Chain::new(self.setup.as_ref())
    }

    /// Statements of the main routine, in link order.
    pub fn main_chain(&self) -> Chain<'_> {
        Chain::new(self.main.as_ref())
    }
}
