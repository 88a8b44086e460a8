//! Keyed, deduplicating store for boilerplate text.
//!
//! Blocks contribute fragments to one of four program sections. The first
//! contribution under a key wins; later contributions under the same key in
//! the same section are ignored. Several block instances can therefore
//! declare the same need (one `#include`, one `attach` call) and the sketch
//! still carries it once.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::trace;

/// Program sections, in the order the assembler emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Includes,
    Declarations,
    Setup,
    Body,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Includes,
        Section::Declarations,
        Section::Setup,
        Section::Body,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Includes => "includes",
            Section::Declarations => "declarations",
            Section::Setup => "setup",
            Section::Body => "body",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub section: Section,
    pub key: String,
    pub text: String,
    /// Rendered ahead of fragments without the flag.
    pub run_first: bool,
}

#[derive(Debug, Default)]
pub struct FragmentRegistry {
    sections: [IndexMap<String, Fragment>; 4],
}

impl FragmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `text` under `key` unless the key is already taken in `section`.
    /// Returns whether the fragment was stored. Trailing whitespace is dropped.
    pub fn contribute(
        &mut self,
        section: Section,
        key: impl Into<String>,
        text: impl Into<String>,
        run_first: bool,
    ) -> bool {
        match self.sections[section.index()].entry(key.into()) {
            Entry::Occupied(entry) => {
                trace!(%section, key = entry.key().as_str(), "fragment already present");
                false
            }
            Entry::Vacant(entry) => {
                let key = entry.key().clone();
                let mut text = text.into();
                text.truncate(text.trim_end().len());
                entry.insert(Fragment {
                    section,
                    key,
                    text,
                    run_first,
                });
                true
            }
        }
    }

    pub fn get(&self, section: Section, key: &str) -> Option<&Fragment> {
        self.sections[section.index()].get(key)
    }

    /// Fragments of `section` in render order: run-first fragments, then the
    /// rest, each group in insertion order.
    pub fn fragments(&self, section: Section) -> impl Iterator<Item = &Fragment> {
        let map = &self.sections[section.index()];
        map.values()
            .filter(|f| f.run_first)
            .chain(map.values().filter(|f| !f.run_first))
    }

    /// Newline-joined text of every fragment in `section`.
    pub fn render(&self, section: Section) -> String {
        self.fragments(section)
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self, section: Section) -> usize {
        self.sections[section.index()].len()
    }

    pub fn is_empty(&self, section: Section) -> bool {
        self.sections[section.index()].is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_writer_wins() {
        let mut registry = FragmentRegistry::new();
        assert!(registry.contribute(Section::Declarations, "servo_9", "Servo myServo9;", false));
        assert!(!registry.contribute(Section::Declarations, "servo_9", "Servo other;", false));
        assert_eq!(registry.render(Section::Declarations), "Servo myServo9;");
        assert_eq!(registry.len(Section::Declarations), 1);
    }

    #[test]
    fn keys_are_scoped_per_section() {
        let mut registry = FragmentRegistry::new();
        registry.contribute(Section::Declarations, "servo_9", "Servo myServo9;", false);
        registry.contribute(Section::Setup, "servo_9", "myServo9.attach(9);", true);
        assert_eq!(registry.render(Section::Setup), "myServo9.attach(9);");
        assert!(registry.is_empty(Section::Includes));
    }

    #[test]
    fn run_first_precedes_regardless_of_registration_order() {
        let mut registry = FragmentRegistry::new();
        registry.contribute(Section::Setup, "io_13", "pinMode(13, OUTPUT);", false);
        registry.contribute(Section::Setup, "servo_9", "myServo9.attach(9);", true);
        registry.contribute(Section::Setup, "io_12", "pinMode(12, INPUT);", false);
        registry.contribute(Section::Setup, "servo_10", "myServo10.attach(10);", true);
        assert_eq!(
            registry.render(Section::Setup),
            "myServo9.attach(9);\nmyServo10.attach(10);\npinMode(13, OUTPUT);\npinMode(12, INPUT);"
        );
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut registry = FragmentRegistry::new();
        registry.contribute(Section::Includes, "b", "#include <B.h>", false);
        registry.contribute(Section::Includes, "a", "#include <A.h>", false);
        assert_eq!(registry.render(Section::Includes), "#include <B.h>\n#include <A.h>");
    }

    #[test]
    fn trailing_newline_is_trimmed() {
        let mut registry = FragmentRegistry::new();
        registry.contribute(Section::Setup, "idled_Rob", "Rob.Itit();\n", true);
        assert_eq!(registry.get(Section::Setup, "idled_Rob").unwrap().text, "Rob.Itit();");
    }

    #[test]
    fn empty_section_renders_empty() {
        assert_eq!(FragmentRegistry::new().render(Section::Body), "");
    }
}
