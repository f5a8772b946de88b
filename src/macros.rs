/// Builds a [`Token`](crate::lexer::tokens::Token) without spelling the
/// struct out at every lexer call site.
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $literal:expr, $line:expr, $column:expr) => {
        $crate::lexer::tokens::Token {
            kind: $kind,
            literal: $literal.to_string(),
            line: $line,
            column: $column,
        }
    };
}
