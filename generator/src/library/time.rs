use blocks::block::Block;

use crate::error::Result;
use crate::order::{Order, OrderedCode};
use crate::pass::GenerationPass;

pub(super) fn time_delay(block: &Block, pass: &mut GenerationPass<'_>) -> Result<String> {
    let ms = pass.value_to_code(block, "DELAY_TIME_MILI", Order::Atomic, "0")?;
    Ok(format!("delay({});\n", ms))
}

pub(super) fn time_millis(_block: &Block, _pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    Ok(OrderedCode::atomic("millis()"))
}
