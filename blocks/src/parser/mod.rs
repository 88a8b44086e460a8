pub mod error;
mod lowering;

pub use error::ParseError;

use crate::Program;

/// Parser entry point. Reads a TOML program document.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse the source document into a complete Program.
    pub fn parse(&self) -> Result<Program, Vec<ParseError>> {
        let raw: lowering::RawProgram = toml::from_str(&self.source).map_err(|e| {
            let span = e.span().unwrap_or(0..0);
            vec![ParseError::new(e.message().trim(), span, self.file_id)]
        })?;
        lowering::lower_program(raw, self.file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;

    fn parse(source: &str) -> Result<Program, Vec<ParseError>> {
        Parser::new(source.to_string(), 0).parse()
    }

    #[test]
    fn statement_array_becomes_chain() {
        let program = parse(
            r#"
[[block]]
type = "servo_write"
fields = { SERVO_PIN = 9 }

[[block]]
id = "second"
type = "time_delay"
"#,
        )
        .unwrap();
        let kinds: Vec<&str> = program.main_chain().map(|b| b.kind.as_str()).collect();
        assert_eq!(kinds, vec!["servo_write", "time_delay"]);
        let ids: Vec<&str> = program.main_chain().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["servo_write#1", "second"]);
        assert!(program.setup.is_none());
    }

    #[test]
    fn generated_ids_count_per_type() {
        let program = parse(
            r#"
[[block]]
type = "servo_write"
fields = { SERVO_PIN = 9 }

[[block]]
type = "time_delay"

[[block]]
type = "servo_write"
fields = { SERVO_PIN = 10 }
"#,
        )
        .unwrap();
        let ids: Vec<&str> = program.main_chain().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["servo_write#1", "time_delay#1", "servo_write#2"]);
    }

    #[test]
    fn scalar_fields_are_normalised() {
        let program = parse(
            r#"
[[block]]
type = "demo"
fields = { A = 9, B = 2.5, C = true, D = "A0" }
"#,
        )
        .unwrap();
        let block = program.main.unwrap();
        assert_eq!(block.field("A"), Some("9"));
        assert_eq!(block.field("B"), Some("2.5"));
        assert_eq!(block.field("C"), Some("true"));
        assert_eq!(block.field("D"), Some("A0"));
    }

    #[test]
    fn nested_inputs_and_statements() {
        let program = parse(
            r#"
board = "mega"

[[setup]]
type = "time_delay"

[[block]]
type = "controls_if"
inputs.IF0 = { type = "logic_boolean", fields = { BOOL = "TRUE" } }
statements.DO0 = [
    { type = "time_delay" },
    { type = "time_delay", inputs.DELAY_TIME_MILI = { type = "math_number", fields.NUM = 5 } },
]
"#,
        )
        .unwrap();
        assert_eq!(program.board.as_deref(), Some("mega"));
        assert_eq!(program.setup_chain().count(), 1);
        let block = program.main.unwrap();
        assert_eq!(block.input("IF0").unwrap().kind, "logic_boolean");
        let nested: Vec<&Block> = block.statement("DO0").collect();
        assert_eq!(nested.len(), 2);
        let delay = nested[1].input("DELAY_TIME_MILI").unwrap();
        assert_eq!(delay.field("NUM"), Some("5"));
    }

    #[test]
    fn block_span_points_at_type() {
        let source = "[[block]]\ntype = \"servo_read\"\n";
        let program = parse(source).unwrap();
        let span = program.main.unwrap().span.clone();
        assert_eq!(&source[span], "\"servo_read\"");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let errors = parse(
            r#"
[[block]]
id = "x"
type = "time_delay"

[[block]]
id = "x"
type = "time_delay"
"#,
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("duplicate block id 'x'"));
        assert!(errors[0].related.is_some());
    }

    #[test]
    fn table_field_is_rejected() {
        let errors = parse(
            r#"
[[block]]
type = "demo"
fields = { PIN = { nested = 1 } }
"#,
        )
        .unwrap_err();
        assert!(errors[0].message.contains("field 'PIN'"));
    }

    #[test]
    fn empty_type_is_rejected() {
        let errors = parse("[[block]]\ntype = \"  \"\n").unwrap_err();
        assert!(errors[0].message.contains("empty block type"));
    }

    #[test]
    fn toml_syntax_error_has_span() {
        let errors = parse("[[block]\ntype = 1").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(!errors[0].message.is_empty());
    }

    #[test]
    fn missing_type_is_rejected() {
        let errors = parse("[[block]]\nid = \"a\"\n").unwrap_err();
        assert!(errors[0].message.contains("type"));
    }
}
