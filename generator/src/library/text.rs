use blocks::block::Block;

use crate::error::Result;
use crate::order::OrderedCode;
use crate::pass::GenerationPass;

/// A string literal. An absent TEXT field is the empty string.
pub(super) fn text(block: &Block, _pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let value = block.field("TEXT").unwrap_or("");
    Ok(OrderedCode::atomic(quote(value)))
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
