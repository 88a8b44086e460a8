use tracing::info;

use crate::fragments::{FragmentRegistry, Section};

/// Final, read-only stage of a pass: lays the sections out as a sketch.
///
/// Output shape: includes, declarations, `setup()` holding the setup
/// section, then `loop()` holding the body section followed by the main
/// statement code. Empty include and declaration sections are left out
/// along with their separating blank line.
#[derive(Debug)]
pub struct Assembler {
    fragments: FragmentRegistry,
    indent: String,
}

impl Assembler {
    pub fn new(fragments: FragmentRegistry, indent_width: usize) -> Self {
        Assembler {
            fragments,
            indent: " ".repeat(indent_width),
        }
    }

    pub fn fragments(&self) -> &FragmentRegistry {
        &self.fragments
    }

    pub fn assemble(&self, main_code: &str) -> String {
        info!(
            includes = self.fragments.len(Section::Includes),
            declarations = self.fragments.len(Section::Declarations),
            setup = self.fragments.len(Section::Setup),
            body = self.fragments.len(Section::Body),
            "assembling program"
        );

        let mut out = String::new();
        for section in [Section::Includes, Section::Declarations] {
            if !self.fragments.is_empty(section) {
                out.push_str(&self.fragments.render(section));
                out.push_str("\n\n");
            }
        }

        out.push_str("void setup() {\n");
        out.push_str(&indent_lines(&self.fragments.render(Section::Setup), &self.indent));
        out.push_str("}\n\nvoid loop() {\n");
        out.push_str(&indent_lines(&self.fragments.render(Section::Body), &self.indent));
        out.push_str(&indent_lines(main_code, &self.indent));
        out.push_str("}\n");
        out
    }
}

/// Prefix each non-empty line with `indent`. Every line of the result,
/// including the last, ends in a newline.
pub(crate) fn indent_lines(text: &str, indent: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_program_has_both_routines() {
        let assembler = Assembler::new(FragmentRegistry::new(), 2);
        assert_eq!(assembler.assemble(""), "void setup() {\n}\n\nvoid loop() {\n}\n");
    }

    #[test]
    fn sections_in_fixed_order() {
        let mut fragments = FragmentRegistry::new();
        fragments.contribute(Section::Setup, "s", "begin();", false);
        fragments.contribute(Section::Body, "b", "int v = read();", false);
        fragments.contribute(Section::Declarations, "d", "int v;", false);
        fragments.contribute(Section::Includes, "i", "#include <X.h>", false);
        let text = Assembler::new(fragments, 2).assemble("use(v);\n");
        assert_eq!(
            text,
            "#include <X.h>\n\nint v;\n\nvoid setup() {\n  begin();\n}\n\nvoid loop() {\n  int v = read();\n  use(v);\n}\n"
        );
    }

    #[test]
    fn indent_width_is_configurable() {
        let text = Assembler::new(FragmentRegistry::new(), 4).assemble("a();\nb();\n");
        assert!(text.contains("    a();\n    b();\n"));
    }

    #[test]
    fn indent_skips_blank_lines() {
        assert_eq!(indent_lines("a\n\nb", "  "), "  a\n\n  b\n");
    }
}
