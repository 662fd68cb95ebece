use thiserror::Error;

/// Errors surfaced by environment operations
///
/// None of these are recoverable runtime faults. They signal a caller bug and the
/// environment state is left untouched when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    /// The raw action index is outside the declared discrete action space
    #[error("invalid action {action}: must be in the range [0, {n})")]
    InvalidAction { action: usize, n: usize },

    /// `step` was called after the episode ended without an intervening `reset`
    #[error("step called on a terminated episode; call reset first")]
    UseAfterTerminal,

    /// A level layout could not be used to build an environment
    #[error("invalid level layout: {0}")]
    InvalidLayout(String),
}

pub type Result<T> = std::result::Result<T, EnvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = EnvError::InvalidAction { action: 7, n: 3 };
        assert_eq!(
            err.to_string(),
            "invalid action 7: must be in the range [0, 3)",
            "invalid action message names the action and the range"
        );
        assert!(
            EnvError::UseAfterTerminal.to_string().contains("reset"),
            "use after terminal message tells the caller to reset"
        );
    }
}
