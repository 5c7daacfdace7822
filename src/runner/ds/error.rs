use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum JErrorType {
    #[error("Uncaught reference error: {0}.")]
    ReferenceError(String),
    #[error("Uncaught type error: {0}.")]
    TypeError(String),
    #[error("Uncaught range error: {0}.")]
    RangeError(String),
    #[error("Uncaught syntax error: {0}.")]
    SyntaxError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_uncaught_format() {
        let e = JErrorType::TypeError("'x' is not a function".to_string());
        assert_eq!(e.to_string(), "Uncaught type error: 'x' is not a function.");
    }
}
