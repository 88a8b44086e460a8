use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use serde::Deserialize;
use toml::Spanned;

use crate::Program;
use crate::block::Block;
use crate::parser::error::ParseError;

/// Program document as it appears on disk.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawProgram {
    #[serde(default)]
    board: Option<String>,
    #[serde(default)]
    setup: Vec<RawBlock>,
    #[serde(default, rename = "block")]
    blocks: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBlock {
    #[serde(default)]
    id: Option<Spanned<String>>,
    #[serde(rename = "type")]
    kind: Spanned<String>,
    #[serde(default)]
    fields: BTreeMap<String, Spanned<toml::Value>>,
    #[serde(default)]
    inputs: BTreeMap<String, RawBlock>,
    #[serde(default)]
    statements: BTreeMap<String, Vec<RawBlock>>,
}

pub(crate) fn lower_program(raw: RawProgram, file_id: usize) -> Result<Program, Vec<ParseError>> {
    let mut lowering = Lowering {
        file_id,
        generated: HashMap::new(),
        seen_ids: HashMap::new(),
        errors: Vec::new(),
    };
    let setup = lowering.lower_chain(raw.setup);
    let main = lowering.lower_chain(raw.blocks);

    if !lowering.errors.is_empty() {
        return Err(lowering.errors);
    }
    Ok(Program {
        board: raw.board,
        setup,
        main,
        source_id: file_id,
    })
}

struct Lowering {
    file_id: usize,
    /// Blocks seen so far per type, used for generated ids.
    generated: HashMap<String, usize>,
    /// Every id handed out, with the span of the block that owns it.
    seen_ids: HashMap<String, Range<usize>>,
    errors: Vec<ParseError>,
}

impl Lowering {
    fn lower_chain(&mut self, raws: Vec<RawBlock>) -> Option<Block> {
        let blocks = raws.into_iter().map(|raw| self.lower_block(raw)).collect();
        Block::link(blocks)
    }

    fn lower_block(&mut self, raw: RawBlock) -> Block {
        let span = raw.kind.span();
        let kind = raw.kind.into_inner().trim().to_string();
        if kind.is_empty() {
            self.errors
                .push(ParseError::new("empty block type", span.clone(), self.file_id));
        }

        let id = match raw.id {
            Some(id) => {
                let id_span = id.span();
                let id = id.into_inner();
                self.claim_id(&id, id_span);
                id
            }
            None => {
                let n = self.generated.entry(kind.clone()).or_insert(0);
                *n += 1;
                let id = format!("{}#{}", kind, n);
                self.claim_id(&id, span.clone());
                id
            }
        };

        let mut fields = BTreeMap::new();
        for (name, value) in raw.fields {
            let value_span = value.span();
            match scalar_to_string(value.into_inner()) {
                Some(text) => {
                    fields.insert(name, text);
                }
                None => self.errors.push(
                    ParseError::new(
                        format!("field '{}' must be a string, number or boolean", name),
                        value_span,
                        self.file_id,
                    )
                    .with_note(format!("in block '{}'", id)),
                ),
            }
        }

        let inputs = raw
            .inputs
            .into_iter()
            .map(|(slot, child)| (slot, self.lower_block(child)))
            .collect();

        let statements = raw
            .statements
            .into_iter()
            .filter_map(|(slot, chain)| self.lower_chain(chain).map(|head| (slot, head)))
            .collect();

        Block {
            id,
            kind,
            fields,
            inputs,
            statements,
            next: None,
            span,
        }
    }

    fn claim_id(&mut self, id: &str, span: Range<usize>) {
        if let Some(first) = self.seen_ids.get(id) {
            self.errors.push(
                ParseError::new(format!("duplicate block id '{}'", id), span, self.file_id)
                    .with_related(first.clone(), "first used here"),
            );
        } else {
            self.seen_ids.insert(id.to_string(), span);
        }
    }
}

fn scalar_to_string(value: toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s),
        toml::Value::Integer(n) => Some(n.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}
