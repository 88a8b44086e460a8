use blocks::block::Block;

use super::{field, invalid_field};
use crate::error::Result;
use crate::order::{Order, OrderedCode};
use crate::pass::GenerationPass;

pub(super) fn logic_boolean(block: &Block, _pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let value = field(block, "BOOL")?;
    match value.to_ascii_uppercase().as_str() {
        "TRUE" => Ok(OrderedCode::atomic("true")),
        "FALSE" => Ok(OrderedCode::atomic("false")),
        _ => Err(invalid_field(block, "BOOL", value).into()),
    }
}

pub(super) fn logic_compare(block: &Block, pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let op = field(block, "OP")?;
    let (operator, order) = match op {
        "EQ" => ("==", Order::Equality),
        "NEQ" => ("!=", Order::Equality),
        "LT" => ("<", Order::Relational),
        "LTE" => ("<=", Order::Relational),
        "GT" => (">", Order::Relational),
        "GTE" => (">=", Order::Relational),
        other => return Err(invalid_field(block, "OP", other).into()),
    };
    let a = pass.value_to_code(block, "A", order, "0")?;
    let b = pass.value_to_code(block, "B", order.tighter(), "0")?;
    Ok(OrderedCode::new(format!("{} {} {}", a, operator, b), order))
}

pub(super) fn logic_operation(block: &Block, pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let op = field(block, "OP")?;
    let (operator, order) = match op {
        "AND" => ("&&", Order::LogicalAnd),
        "OR" => ("||", Order::LogicalOr),
        other => return Err(invalid_field(block, "OP", other).into()),
    };
    let a = pass.value_to_code(block, "A", order, "false")?;
    let b = pass.value_to_code(block, "B", order, "false")?;
    Ok(OrderedCode::new(format!("{} {} {}", a, operator, b), order))
}

pub(super) fn logic_negate(block: &Block, pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let operand = pass.value_to_code(block, "BOOL", Order::UnaryPrefix, "false")?;
    Ok(OrderedCode::new(format!("!{}", operand), Order::UnaryPrefix))
}
