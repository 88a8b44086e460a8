use std::collections::HashMap;

use blocks::Program;
use blocks::block::Block;
use blocks::board::{BoardProfile, PinRole};
use blocks::chain::Chain;
use tracing::debug;

use crate::assembler::{Assembler, indent_lines};
use crate::error::{DiagnosticError, GenerationError, Related, Result};
use crate::fragments::{FragmentRegistry, Section};
use crate::order::{Order, OrderedCode};
use crate::pins::{PinClaim, PinReservationTable};
use crate::table::{BlockGenerator, GeneratorTable};

/// Maximum nesting of value and statement blocks within one another.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Spaces per indentation level in the emitted sketch.
    pub indent: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions { indent: 2 }
    }
}

/// State of one generation pass.
///
/// The pass owns the fragment registry and pin table exclusively while it
/// walks the program. Finishing it moves the registry into an
/// [`Assembler`], so nothing can be contributed once assembly starts.
pub struct GenerationPass<'a> {
    board: &'a BoardProfile,
    table: &'a GeneratorTable,
    options: GenerateOptions,
    source_id: usize,
    fragments: FragmentRegistry,
    pins: PinReservationTable,
    /// Uses per identifier base, for `distinct_name`.
    names: HashMap<String, usize>,
    depth: usize,
}

/// Generate the sketch for `program` in a fresh pass.
pub fn generate(
    program: &Program,
    board: &BoardProfile,
    table: &GeneratorTable,
    options: GenerateOptions,
) -> Result<String> {
    GenerationPass::new(board, table, options).run(program)
}

impl<'a> GenerationPass<'a> {
    pub fn new(board: &'a BoardProfile, table: &'a GeneratorTable, options: GenerateOptions) -> Self {
        GenerationPass {
            board,
            table,
            options,
            source_id: 0,
            fragments: FragmentRegistry::new(),
            pins: PinReservationTable::new(),
            names: HashMap::new(),
            depth: 0,
        }
    }

    /// Traverse the setup and main chains, then assemble the sketch.
    /// Any error drops the partially built state.
    pub fn run(mut self, program: &Program) -> Result<String> {
        self.source_id = program.source_id;
        debug!(board = self.board.name.as_str(), "starting generation pass");

        let user_setup = self.chain_to_code(program.setup_chain())?;
        if !user_setup.is_empty() {
            self.add_setup("user_setup", user_setup, false);
        }
        let main_code = self.chain_to_code(program.main_chain())?;

        Ok(self.finish().assemble(&main_code))
    }

    /// End traversal and hand the collected fragments to the assembler.
    pub fn finish(self) -> Assembler {
        debug!(pins = self.pins.len(), "traversal complete");
        Assembler::new(self.fragments, self.options.indent)
    }

    pub fn board(&self) -> &BoardProfile {
        self.board
    }

    pub fn fragments(&self) -> &FragmentRegistry {
        &self.fragments
    }

    pub fn pins(&self) -> &PinReservationTable {
        &self.pins
    }

    pub fn contribute(
        &mut self,
        section: Section,
        key: impl Into<String>,
        text: impl Into<String>,
        run_first: bool,
    ) -> bool {
        let key = key.into();
        let stored = self.fragments.contribute(section, key.as_str(), text, run_first);
        if stored {
            debug!(%section, key = key.as_str(), run_first, "fragment contributed");
        }
        stored
    }

    pub fn add_include(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.contribute(Section::Includes, key, text, false);
    }

    pub fn add_declaration(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.contribute(Section::Declarations, key, text, false);
    }

    pub fn add_setup(&mut self, key: impl Into<String>, text: impl Into<String>, run_first: bool) {
        self.contribute(Section::Setup, key, text, run_first);
    }

    /// Code placed at the top of the main routine, ahead of the statements.
    pub fn add_body(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.contribute(Section::Body, key, text, false);
    }

    /// Claim `pin` for `role` on behalf of `block`.
    pub fn reserve_pin(&mut self, block: &Block, pin: &str, role: PinRole, purpose: &str) -> Result<()> {
        let claim = PinClaim::new(pin, role, purpose).claimed_by(block.id.clone(), block.span.clone());
        let Err(error) = self.pins.claim(self.board, claim) else {
            return Ok(());
        };

        let is_conflict = matches!(error, GenerationError::PinConflict { .. });
        let mut diagnostic = DiagnosticError::from(error).at_block(block, self.source_id);
        if is_conflict {
            if let Some((block_id, span)) = self.pins.get(pin).and_then(|c| c.claimant.clone()) {
                diagnostic = diagnostic.with_related(Related {
                    block_id,
                    span,
                    message: format!("pin {} first reserved here", pin),
                });
            }
        }
        Err(diagnostic)
    }

    /// Code for the value block connected at `slot`, parenthesized if it binds
    /// more weakly than `required`. An empty slot yields `default` verbatim.
    pub fn value_to_code(
        &mut self,
        block: &Block,
        slot: &str,
        required: Order,
        default: &str,
    ) -> Result<String> {
        match block.input(slot) {
            None => Ok(default.to_string()),
            Some(child) => Ok(self.value_code(child)?.embed(required)),
        }
    }

    /// Run the value generator for `block`.
    pub fn value_code(&mut self, block: &Block) -> Result<OrderedCode> {
        let source_id = self.source_id;
        let generator = self.table.get(&block.kind);
        self.descend(|pass| match generator {
            Some(BlockGenerator::Value(generate)) => generate(block, pass),
            Some(BlockGenerator::Statement(_)) => Err(GenerationError::WrongBlockShape {
                block_type: block.kind.clone(),
                expected: "a value",
            }
            .into()),
            None => Err(GenerationError::UnknownBlockType(block.kind.clone()).into()),
        })
        .map_err(|e| e.at_block(block, source_id))
    }

    /// The nested chain connected at statement slot `slot`, indented one level.
    pub fn statement_to_code(&mut self, block: &Block, slot: &str) -> Result<String> {
        let code = self.chain_to_code(block.statement(slot))?;
        Ok(self.indent(&code))
    }

    /// Concatenated code of every statement in `chain`, in link order.
    pub fn chain_to_code(&mut self, chain: Chain<'_>) -> Result<String> {
        let mut code = String::new();
        for block in chain {
            code.push_str(&self.statement_code(block)?);
        }
        Ok(code)
    }

    fn statement_code(&mut self, block: &Block) -> Result<String> {
        debug!(block = block.id.as_str(), kind = block.kind.as_str(), "generating statement");
        let source_id = self.source_id;
        let generator = self.table.get(&block.kind);
        let mut code = self
            .descend(|pass| match generator {
                Some(BlockGenerator::Statement(generate)) => generate(block, pass),
                Some(BlockGenerator::Value(_)) => Err(GenerationError::WrongBlockShape {
                    block_type: block.kind.clone(),
                    expected: "a statement",
                }
                .into()),
                None => Err(GenerationError::UnknownBlockType(block.kind.clone()).into()),
            })
            .map_err(|e| e.at_block(block, source_id))?;
        if !code.is_empty() && !code.ends_with('\n') {
            code.push('\n');
        }
        Ok(code)
    }

    fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            return Err(GenerationError::NestingTooDeep(MAX_DEPTH).into());
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// An identifier based on `base` not handed out before in this pass:
    /// `count`, then `count2`, `count3`, ...
    pub fn distinct_name(&mut self, base: &str) -> String {
        let uses = self.names.entry(base.to_string()).or_insert(0);
        *uses += 1;
        if *uses == 1 {
            base.to_string()
        } else {
            format!("{}{}", base, uses)
        }
    }

    /// Indent `code` by one level.
    pub fn indent(&self, code: &str) -> String {
        indent_lines(code, &" ".repeat(self.options.indent))
    }
}
