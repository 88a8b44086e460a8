pub mod assembler;
pub mod error;
pub mod fragments;
pub mod library;
pub mod order;
pub mod pass;
pub mod pins;
pub mod table;

pub use error::{DiagnosticError, GenerationError};
pub use order::{Order, OrderedCode};
pub use pass::{GenerateOptions, GenerationPass, generate};
pub use table::GeneratorTable;
