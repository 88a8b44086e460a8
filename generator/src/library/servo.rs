//! Arduino Servo library blocks.
//!
//! ```text
//! #include <Servo.h>
//! Servo myServoX;
//! setup { myServoX.attach(X); }
//! loop  { myServoX.write(Y); }
//! ```

use blocks::block::Block;
use blocks::board::PinRole;

use super::field;
use crate::error::Result;
use crate::order::{Order, OrderedCode};
use crate::pass::GenerationPass;

/// Reserve `pin` as a servo and contribute the include, declaration and
/// attach call. Returns the servo object's name.
fn attach(block: &Block, pass: &mut GenerationPass<'_>, pin: &str, purpose: &str) -> Result<String> {
    pass.reserve_pin(block, pin, PinRole::Servo, purpose)?;

    let servo = format!("myServo{}", pin);
    pass.add_include("servo", "#include <Servo.h>");
    pass.add_declaration(format!("servo_{}", pin), format!("Servo {};", servo));
    pass.add_setup(
        format!("servo_{}", pin),
        format!("{}.attach({});", servo, pin),
        true,
    );
    Ok(servo)
}

pub(super) fn servo_write(block: &Block, pass: &mut GenerationPass<'_>) -> Result<String> {
    let pin = field(block, "SERVO_PIN")?;
    let angle = pass.value_to_code(block, "SERVO_ANGLE", Order::Atomic, "90")?;
    let servo = attach(block, pass, pin, "Servo Write")?;
    Ok(format!("{}.write({});\n", servo, angle))
}

pub(super) fn servo_read(block: &Block, pass: &mut GenerationPass<'_>) -> Result<OrderedCode> {
    let pin = field(block, "SERVO_PIN")?;
    let servo = attach(block, pass, pin, "Servo Read")?;
    Ok(OrderedCode::atomic(format!("{}.read()", servo)))
}
