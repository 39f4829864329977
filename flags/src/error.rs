//! Error types for flag registration, argument parsing and configuration.
//!
//! Registration errors are programmer mistakes caught while building a
//! [`FlagSet`](crate::FlagSet). Parse errors and value errors describe bad
//! user input and carry everything needed to render a helpful message.

use std::num::ParseIntError;

use thiserror::Error;

/// A flag value rejected the argument it was given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// No argument was given and the value requires one.
    #[error("missing value")]
    MissingValue,

    /// The argument is not a decimal integer.
    #[error("'{arg}' is not a valid integer ({source})")]
    InvalidInteger {
        /// The rejected argument.
        arg: String,
        /// Underlying parse failure.
        source: ParseIntError,
    },

    /// Integer below the accepted range.
    #[error("minimum value is '{min}', but got '{got}' instead")]
    BelowMinimum {
        /// Smallest accepted value.
        min: i64,
        /// The argument as given.
        got: String,
    },

    /// Integer above the accepted range.
    #[error("maximum value is '{max}', but got '{got}' instead")]
    AboveMaximum {
        /// Largest accepted value.
        max: i64,
        /// The argument as given.
        got: String,
    },

    /// `#` notation with a digit count other than 3, 4, 6 or 8.
    #[error("invalid hexadecimal color encoding (invalid length)")]
    InvalidHexLength,

    /// `#` notation with a non-hexadecimal digit.
    #[error("invalid hexadecimal character '{name}' (code point = {code_point})")]
    InvalidHexChar {
        /// Printable name of the character.
        name: String,
        /// The character's code point.
        code_point: u32,
    },

    /// `rgb`/`rgba` prefix without surrounding braces.
    #[error("expected symmetric braces surrounding the color channel values (e.g. \"rgb(200, 128, 0)\")")]
    MissingBraces,

    /// Too short to hold the required components.
    #[error("incomplete color definition")]
    IncompleteColor,

    /// Implicit notation that does not start with a digit.
    #[error("invalid color format: expected a number, braces or a prefix (e.g. \"rgb\", \"#\")")]
    InvalidColorStart,

    /// More components than the notation allows.
    #[error("too many color components (expected only {max})")]
    TooManyComponents {
        /// Largest accepted component count.
        max: usize,
    },

    /// Fewer components than a notation with a variable count needs.
    #[error("too few color components (expected at least {min})")]
    TooFewComponents {
        /// Smallest accepted component count.
        min: usize,
    },

    /// Component count differs from a notation with a fixed count.
    #[error("too few color components (expected {expected} components)")]
    WrongComponentCount {
        /// The required component count.
        expected: usize,
    },

    /// A color channel above 255.
    #[error("color component can't exceed 255")]
    ComponentOverflow,

    /// A character between components that is not a space or punctuation.
    #[error("invalid color component separator '{name}' (only spaces and punctuation symbols allowed)")]
    InvalidSeparator {
        /// Printable name of the character.
        name: String,
    },

    /// The argument ends like a directory or a path list.
    #[error("given value doesn't look like a file path")]
    NotAPath,

    /// The path does not carry one of the allowed extensions.
    #[error("file path must end with {expected}")]
    WrongExtension {
        /// Human-readable list of allowed extensions.
        expected: String,
    },

    /// Free-form rejection from a custom [`FlagValue`](crate::FlagValue).
    #[error("{0}")]
    Invalid(String),
}

/// Mistakes made while registering flags or aliases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Long flag names need at least two code points.
    #[error("flag name must have at least 2 characters ('{0}')")]
    NameTooShort(String),
    /// Long flag names are registered without their `--`.
    #[error("flag name can't start with a dash ('{0}')")]
    LeadingDash(String),
    /// A flag with this long name already exists.
    #[error("flag name already registered ('{0}')")]
    AlreadyRegistered(String),
    /// Aliases can only point at registered flags.
    #[error("can't register aliases for inexistent '{0}' flag")]
    UnknownFlag(String),
    /// Aliases must be visible, non-dash characters.
    #[error("invalid short alias '{0}'")]
    InvalidAlias(char),
    /// The alias already points at this flag.
    #[error("repeated registration of alias '{alias}' to '{flag}'")]
    DuplicateAlias {
        /// The alias letter.
        alias: char,
        /// The flag it points at.
        flag: String,
    },
    /// The alias already points at another flag.
    #[error("can't register alias '{alias}' to '{flag}' (already registered to '{existing}')")]
    AliasTaken {
        /// The alias letter.
        alias: char,
        /// The flag the caller tried to alias.
        flag: String,
        /// The flag that owns the alias.
        existing: String,
    },
}

/// Bad command-line input found by [`FlagSet::parse`](crate::FlagSet::parse).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `--name` that is not registered.
    #[error("unrecognized flag '{flag}'")]
    UnknownFlag {
        /// The flag as typed.
        flag: String,
        /// Closest registered long name, without dashes.
        suggestion: Option<String>,
    },

    /// A `-c` whose letter is not a registered alias.
    #[error("unrecognized short flag '{flag}'")]
    UnknownAlias {
        /// The flag as typed.
        flag: String,
    },

    /// A single dash followed by more than one letter.
    #[error("multi-letter flags not allowed for single dash flags ('{flag}')")]
    MultiLetterShortFlag {
        /// The flag as typed.
        flag: String,
    },

    /// The same flag was given twice.
    #[error("duplicated flag '{flag}', program flags can't be repeated")]
    DuplicateFlag {
        /// The flag as typed the second time.
        flag: String,
    },

    /// The flag's value rejected its argument.
    #[error("invalid value for '{flag}': {source}")]
    InvalidValue {
        /// The flag as typed.
        flag: String,
        /// The argument, or `None` when it was missing.
        value: Option<String>,
        /// Why the value was rejected.
        source: ValueError,
    },

    /// A positional argument where none are accepted.
    #[error("unexpected '{arg}' argument")]
    UnexpectedArgument {
        /// The argument as given.
        arg: String,
    },
}

impl ParseError {
    /// Process exit code for this error: `2`, the usage error convention.
    pub fn exit_code(&self) -> i32 {
        USAGE_EXIT_CODE
    }
}

/// Exit code for invalid command-line usage.
pub const USAGE_EXIT_CODE: i32 = 2;

/// Exit code for fatal runtime errors.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Errors loading or saving a [`UsageConfig`](crate::UsageConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}
