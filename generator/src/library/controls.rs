use blocks::block::Block;

use crate::error::Result;
use crate::order::Order;
use crate::pass::GenerationPass;

/// `if` / `else if` / `else`. Branch `n` uses input `IF<n>` and statements
/// `DO<n>`; branches continue while either slot is present.
pub(super) fn controls_if(block: &Block, pass: &mut GenerationPass<'_>) -> Result<String> {
    let mut code = String::new();
    let mut n = 0;
    loop {
        let condition = pass.value_to_code(block, &format!("IF{}", n), Order::Lowest, "false")?;
        let branch = pass.statement_to_code(block, &format!("DO{}", n))?;
        if n > 0 {
            code.push_str(" else ");
        }
        code.push_str(&format!("if ({}) {{\n{}}}", condition, branch));

        n += 1;
        if block.input(&format!("IF{}", n)).is_none() && !block.has_statement(&format!("DO{}", n)) {
            break;
        }
    }
    if block.has_statement("ELSE") {
        let branch = pass.statement_to_code(block, "ELSE")?;
        code.push_str(&format!(" else {{\n{}}}", branch));
    }
    code.push('\n');
    Ok(code)
}

pub(super) fn controls_repeat_ext(block: &Block, pass: &mut GenerationPass<'_>) -> Result<String> {
    let times = pass.value_to_code(block, "TIMES", Order::Relational.tighter(), "0")?;
    let counter = pass.distinct_name("count");
    let body = pass.statement_to_code(block, "DO")?;
    Ok(format!(
        "for (int {c} = 0; {c} < {times}; {c}++) {{\n{body}}}\n",
        c = counter,
        times = times,
        body = body
    ))
}
