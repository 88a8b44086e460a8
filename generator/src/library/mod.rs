//! Built-in block generators, registered by type tag.

mod controls;
mod io;
mod logic;
mod math;
mod serial;
mod servo;
mod suny;
mod text;
mod time;

use blocks::block::Block;

use crate::error::GenerationError;
use crate::table::GeneratorTable;

pub fn register_builtins(table: &mut GeneratorTable) {
    table.register_statement("servo_write", servo::servo_write);
    table.register_value("servo_read", servo::servo_read);

    table.register_statement("led_w_rbg", suny::led_w_rbg);
    table.register_value("ulstra", suny::ulstra);
    table.register_value("touch_sensor", suny::touch_sensor);

    table.register_value("math_number", math::math_number);
    table.register_value("math_arithmetic", math::math_arithmetic);

    table.register_value("logic_boolean", logic::logic_boolean);
    table.register_value("logic_compare", logic::logic_compare);
    table.register_value("logic_operation", logic::logic_operation);
    table.register_value("logic_negate", logic::logic_negate);

    table.register_statement("io_digitalwrite", io::io_digitalwrite);
    table.register_value("io_digitalread", io::io_digitalread);
    table.register_statement("io_analogwrite", io::io_analogwrite);
    table.register_value("io_analogread", io::io_analogread);
    table.register_value("io_highlow", io::io_highlow);

    table.register_statement("time_delay", time::time_delay);
    table.register_value("time_millis", time::time_millis);

    table.register_statement("controls_if", controls::controls_if);
    table.register_statement("controls_repeat_ext", controls::controls_repeat_ext);

    table.register_statement("serial_print", serial::serial_print);
    table.register_value("text", text::text);
}

/// A field the block cannot be generated without.
fn field<'b>(block: &'b Block, name: &str) -> Result<&'b str, GenerationError> {
    match block.field(name).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(GenerationError::MissingField {
            block_type: block.kind.clone(),
            field: name.to_string(),
        }),
    }
}

fn invalid_field(block: &Block, name: &str, value: &str) -> GenerationError {
    GenerationError::InvalidField {
        block_type: block.kind.clone(),
        field: name.to_string(),
        value: value.to_string(),
    }
}
