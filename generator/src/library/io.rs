//! Digital and analogue pin access.

use blocks::block::Block;
use blocks::board::PinRole;

use super::{field, invalid_field};
use crate::error::Result;
use crate::order::{Order, OrderedCode};
use crate::pass::GenerationPass;

fn pin_mode(pass: &mut GenerationPass<'_>, pin: &str, mode: &str) {
    pass.add_setup(format!("io_{}", pin), format!("pinMode({}, {});", pin, mode), false);
}

pub(super) fn io_digitalwrite(block: &Block, pass: &mut GenerationPass<'_>) -> Result<String> {
    let pin = field(block, "PIN")?;
    let state = pass.value_to_code(block, "STATE", Order::Atomic, "LOW")?;
    pass.reserve_pin(block, pin, PinRole::DigitalOutput, "Digital Write")?;
    pin_mode(pass, pin, "OUTPUT");
    Ok(format!("digitalWrite({}, {});\n", pin, state))
}

pub(super) fn io_digitalread(block: &Block, pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let pin = field(block, "PIN")?;
    pass.reserve_pin(block, pin, PinRole::DigitalInput, "Digital Read")?;
    pin_mode(pass, pin, "INPUT");
    Ok(OrderedCode::atomic(format!("digitalRead({})", pin)))
}

pub(super) fn io_analogwrite(block: &Block, pass: &mut GenerationPass<'_>) -> Result<String> {
    let pin = field(block, "PIN")?;
    let value = pass.value_to_code(block, "NUM", Order::Atomic, "0")?;
    pass.reserve_pin(block, pin, PinRole::Pwm, "Analogue Write")?;
    pin_mode(pass, pin, "OUTPUT");
    Ok(format!("analogWrite({}, {});\n", pin, value))
}

pub(super) fn io_analogread(block: &Block, pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let pin = field(block, "PIN")?;
    pass.reserve_pin(block, pin, PinRole::AnalogInput, "Analogue Read")?;
    pin_mode(pass, pin, "INPUT");
    Ok(OrderedCode::atomic(format!("analogRead({})", pin)))
}

pub(super) fn io_highlow(block: &Block, _pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let state = field(block, "STATE")?;
    match state {
        "HIGH" | "LOW" => Ok(OrderedCode::atomic(state)),
        other => Err(invalid_field(block, "STATE", other).into()),
    }
}
