use thiserror::Error;

/// Validation failures for list and todo names.
///
/// The display text is shown to the user as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("List name must have 1 to 100 characters.")]
    ListNameLength,
    #[error("The list name must be unique.")]
    ListNameTaken,
    #[error("Todo name must have 1 to 100 characters.")]
    TodoNameLength,
    #[error("Todo name must be unique.")]
    TodoNameTaken,
}
