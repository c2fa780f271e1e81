use std::fmt;

/// Error returned by a handler.
///
/// A handler that returns an error has not written any entity.
#[derive(Debug)]
pub enum MappingError {
    /// Reading from or writing to the entity store failed.
    Store,
    /// Reading the current contract state failed.
    ContractRead,
}

impl error_stack::Context for MappingError {}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::Store => f.write_str("mapping error: entity store"),
            MappingError::ContractRead => f.write_str("mapping error: contract read"),
        }
    }
}
