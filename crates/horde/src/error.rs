//! # Simulation Error Types
//!
//! Everything that can go wrong happens at load time. Once a
//! [`crate::Simulation`] exists, a frame either completes or the program is
//! in an undefined state; there is no per-frame recoverable error.

use thiserror::Error;

/// Errors raised while loading configuration or the monster catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HordeError {
    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A TOML document could not be parsed.
    #[error("failed to parse {what}: {message}")]
    Parse {
        /// What was being parsed ("config", "monster catalog").
        what: &'static str,
        /// Parser diagnostic.
        message: String,
    },

    /// A file could not be read.
    #[error("failed to read {path}: {message}")]
    Io {
        /// Path that failed.
        path: String,
        /// OS error text.
        message: String,
    },

    /// The monster catalog has no sets.
    #[error("monster catalog is empty")]
    EmptyCatalog,

    /// A monster set has no types; random selection over it is undefined.
    #[error("monster set '{0}' has no monster types")]
    EmptyMonsterSet(String),

    /// A monster references a sprite the asset collaborator does not know.
    #[error("monster '{monster}' references unknown sprite '{sprite}'")]
    UnknownSprite {
        /// Monster display name.
        monster: String,
        /// Sprite reference that failed to resolve.
        sprite: String,
    },

    /// The worker pool could not be created.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),
}

/// Result type for simulation setup.
pub type HordeResult<T> = Result<T, HordeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = HordeError::EmptyMonsterSet("undead".to_string());
        assert_eq!(err.to_string(), "monster set 'undead' has no monster types");

        let err = HordeError::UnknownSprite {
            monster: "Ghoul".to_string(),
            sprite: "ghoul.png".to_string(),
        };
        assert!(err.to_string().contains("ghoul.png"));
    }
}
