//! Result type alias for vsweep

use super::errors::VsweepError;

/// Result type alias for vsweep operations
///
/// # Examples
///
/// ```
/// use vsweep::domain::result::Result;
/// use vsweep::domain::errors::VsweepError;
///
/// fn failing_function() -> Result<()> {
///     Err(VsweepError::Configuration("missing executable".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, VsweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
