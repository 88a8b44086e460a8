use blocks::block::Block;

use super::{field, invalid_field};
use crate::error::Result;
use crate::order::{Order, OrderedCode};
use crate::pass::GenerationPass;

pub(super) fn math_number(block: &Block, _pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let num = field(block, "NUM")?;
    // Rust accepts `inf` and `NaN`; C++ has no such literals.
    if !num.parse::<f64>().is_ok_and(f64::is_finite) {
        return Err(invalid_field(block, "NUM", num).into());
    }
    let order = if num.starts_with('-') {
        Order::UnaryPrefix
    } else {
        Order::Atomic
    };
    Ok(OrderedCode::new(num, order))
}

pub(super) fn math_arithmetic(block: &Block, pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let op = field(block, "OP")?;
    let (operator, order) = match op {
        "ADD" => ("+", Order::Additive),
        "MINUS" => ("-", Order::Additive),
        "MULTIPLY" => ("*", Order::Multiplicative),
        "DIVIDE" => ("/", Order::Multiplicative),
        "MODULO" => ("%", Order::Multiplicative),
        other => return Err(invalid_field(block, "OP", other).into()),
    };
    let a = pass.value_to_code(block, "A", order, "0")?;
    // Integer division makes even `*` unsafe to reassociate on the right.
    let b = pass.value_to_code(block, "B", order.tighter(), "0")?;
    Ok(OrderedCode::new(format!("{} {} {}", a, operator, b), order))
}
