//! Suny robot kit: RGB LEDs, ultrasonic and touch sensors on numbered ports.

use blocks::block::Block;

use super::{field, invalid_field};
use crate::error::Result;
use crate::order::OrderedCode;
use crate::pass::GenerationPass;

const COLORS: &[&str] = &["R", "B", "G", "Cy", "P", "Or", "W", "Y", "V"];
const PORTS: std::ops::RangeInclusive<u8> = 1..=8;

fn robot(pass: &mut GenerationPass<'_>) {
    pass.add_include("idarduino", "#include <Arduino.h>");
    pass.add_include("idsuny", "#include <Suny.h>");
    pass.add_declaration("idled_Rob", "Suny Rob;");
    pass.add_setup("idled_Rob", "Rob.Itit();", true);
}

fn port<'b>(block: &'b Block, name: &str) -> Result<&'b str> {
    let value = field(block, name)?;
    match value.parse::<u8>() {
        Ok(n) if PORTS.contains(&n) => Ok(value),
        _ => Err(invalid_field(block, name, value).into()),
    }
}

pub(super) fn led_w_rbg(block: &Block, pass: &mut GenerationPass<'_>) -> Result<String> {
    let color = field(block, "color")?;
    if !COLORS.contains(&color) {
        return Err(invalid_field(block, "color", color).into());
    }
    robot(pass);
    Ok(format!("Rob.SetAllLed(\"{}\");\n", color))
}

pub(super) fn ulstra(block: &Block, pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let port = port(block, "port")?;
    robot(pass);
    Ok(OrderedCode::atomic(format!("Rob.getSonarValue({})", port)))
}

pub(super) fn touch_sensor(block: &Block, pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let port = port(block, "PORT")?;
    robot(pass);
    Ok(OrderedCode::atomic(format!("Rob.getTouchLedValue({})", port)))
}
