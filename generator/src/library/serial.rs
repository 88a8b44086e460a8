use blocks::block::Block;
use blocks::board::PinRole;

use super::field;
use crate::error::Result;
use crate::order::Order;
use crate::pass::GenerationPass;

const BAUD_RATE: u32 = 9600;

pub(super) fn serial_print(block: &Block, pass: &mut GenerationPass<'_>) -> Result<String> {
    let port = field(block, "SERIAL_ID")?;
    let content = pass.value_to_code(block, "CONTENT", Order::Lowest, "0")?;
    pass.reserve_pin(block, port, PinRole::Serial, "Serial Print")?;
    pass.add_setup(
        format!("serial_{}", port),
        format!("{}.begin({});", port, BAUD_RATE),
        true,
    );

    let newline = block
        .field("NEW_LINE")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
    let method = if newline { "println" } else { "print" };
    Ok(format!("{}.{}({});\n", port, method, content))
}
