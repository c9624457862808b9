//! Function-call syntax recognised in column values.
//!
//! An expression is a whole value of the form `name(arg, arg, ...)` where
//! `name` is an identifier. Anything else is a literal.

/// A parsed `name(args)` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorExpression {
    /// Function name as written
    pub name: String,

    /// Text between the parentheses, untouched
    pub raw_args: String,
}

impl GeneratorExpression {
    /// Parse `text` as an expression, or `None` if it is a literal.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let open = text.find('(')?;
        let inner = text[open + 1..].strip_suffix(')')?;
        let name = &text[..open];

        let mut chars = name.chars();
        let starts_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            raw_args: inner.to_string(),
        })
    }

    /// Comma separated arguments, trimmed. Empty parentheses give no arguments.
    pub fn args(&self) -> Vec<&str> {
        if self.raw_args.trim().is_empty() {
            return Vec::new();
        }
        self.raw_args.split(',').map(str::trim).collect()
    }

    /// Canonical spelling, used to key per-expression generator state.
    pub fn canonical(&self) -> String {
        format!("{}({})", self.name.to_ascii_lowercase(), self.args().join(","))
    }
}

/// Whether `text` is a function call rather than a literal.
pub fn contains_generator_syntax(text: &str) -> bool {
    GeneratorExpression::parse(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_function_calls() {
        assert!(contains_generator_syntax("randomBytes(16)"));
        assert!(contains_generator_syntax("uuid()"));
        assert!(contains_generator_syntax(" sequence(1, 2) "));
        assert!(contains_generator_syntax("long(12)"));
    }

    #[test]
    fn test_literals_are_not_function_calls() {
        assert!(!contains_generator_syntax("hello"));
        assert!(!contains_generator_syntax("12:abc"));
        assert!(!contains_generator_syntax("(12)"));
        assert!(!contains_generator_syntax("1abc(2)"));
        assert!(!contains_generator_syntax("a b(2)"));
        assert!(!contains_generator_syntax("uuid("));
    }

    #[test]
    fn test_args() {
        let expr = GeneratorExpression::parse("sequence( 10 , 5 )").unwrap();
        assert_eq!(expr.name, "sequence");
        assert_eq!(expr.args(), vec!["10", "5"]);
        assert_eq!(expr.canonical(), "sequence(10,5)");

        let expr = GeneratorExpression::parse("uuid()").unwrap();
        assert!(expr.args().is_empty());
    }
}
