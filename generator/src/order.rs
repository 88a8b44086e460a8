use std::fmt;

/// Binding strength of a generated expression, tightest first.
///
/// Levels follow C/C++ operator precedence. A variant that compares greater
/// than another binds more weakly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Order {
    /// Literals, identifiers, calls.
    Atomic,
    UnaryPostfix,
    UnaryPrefix,
    Multiplicative,
    Additive,
    Shift,
    Relational,
    Equality,
    BitwiseAnd,
    BitwiseXor,
    BitwiseOr,
    LogicalAnd,
    LogicalOr,
    Conditional,
    Assignment,
    /// Accepts anything; the consumer never needs parentheses.
    Lowest,
}

impl Order {
    /// Whether an expression of this order must be parenthesized before it
    /// is embedded where at least `required` is expected.
    pub fn binds_weaker_than(self, required: Order) -> bool {
        self > required
    }

    /// The next tighter level. Used for the right operand of
    /// non-associative operators, so `a - (b - c)` keeps its parentheses.
    pub fn tighter(self) -> Order {
        use Order::*;
        match self {
            Atomic | UnaryPostfix => Atomic,
            UnaryPrefix => UnaryPostfix,
            Multiplicative => UnaryPrefix,
            Additive => Multiplicative,
            Shift => Additive,
            Relational => Shift,
            Equality => Relational,
            BitwiseAnd => Equality,
            BitwiseXor => BitwiseAnd,
            BitwiseOr => BitwiseXor,
            LogicalAnd => BitwiseOr,
            LogicalOr => LogicalAnd,
            Conditional => LogicalOr,
            Assignment => Conditional,
            Lowest => Assignment,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Expression text paired with its binding strength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedCode {
    pub text: String,
    pub order: Order,
}

impl OrderedCode {
    pub fn new(text: impl Into<String>, order: Order) -> Self {
        OrderedCode {
            text: text.into(),
            order,
        }
    }

    pub fn atomic(text: impl Into<String>) -> Self {
        Self::new(text, Order::Atomic)
    }

    /// The text as it must appear in a context requiring `required`.
    pub fn embed(self, required: Order) -> String {
        if self.order.binds_weaker_than(required) {
            format!("({})", self.text)
        } else {
            self.text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_never_wraps() {
        for required in [Order::Atomic, Order::Multiplicative, Order::Lowest] {
            assert_eq!(OrderedCode::atomic("x").embed(required), "x");
        }
    }

    #[test]
    fn weaker_wraps_and_equal_does_not() {
        let sum = || OrderedCode::new("a + b", Order::Additive);
        assert_eq!(sum().embed(Order::Multiplicative), "(a + b)");
        assert_eq!(sum().embed(Order::Additive), "a + b");
        assert_eq!(sum().embed(Order::Relational), "a + b");
    }

    #[test]
    fn lowest_requirement_accepts_everything() {
        let cond = OrderedCode::new("a ? b : c", Order::Conditional);
        assert_eq!(cond.embed(Order::Lowest), "a ? b : c");
    }

    #[test]
    fn tighter_is_strictly_stronger() {
        assert_eq!(Order::Additive.tighter(), Order::Multiplicative);
        assert!(Order::Additive.binds_weaker_than(Order::Additive.tighter()));
        assert_eq!(Order::Atomic.tighter(), Order::Atomic);
    }
}
