//! The [`FlagValue`] trait and the bounded integer value.

use std::any::Any;
use std::fmt;

use crate::error::ValueError;

/// A value that a flag parses its argument into.
///
/// `parse_from_arg` receives the argument without surrounding quotes or a
/// leading `=`. An empty string means the flag was given without a value;
/// return [`ValueError::MissingValue`] if that is not acceptable.
///
/// # Examples
///
/// ```
/// use std::any::Any;
/// use std::fmt;
///
/// use flagkit_flags::{FlagValue, ValueError};
///
/// #[derive(Debug, Default)]
/// struct Name(String);
///
/// impl fmt::Display for Name {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str(&self.0)
///     }
/// }
///
/// impl FlagValue for Name {
///     fn parse_from_arg(&mut self, arg: &str) -> Result<(), ValueError> {
///         if arg.is_empty() {
///             return Err(ValueError::MissingValue);
///         }
///         self.0 = arg.to_string();
///         Ok(())
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let mut name = Name::default();
/// name.parse_from_arg("ferris").unwrap();
/// assert_eq!(name.to_string(), "ferris");
/// ```
pub trait FlagValue: fmt::Display + fmt::Debug + Send + 'static {
    /// Parses `arg` into this value, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] describing why `arg` was rejected. The value
    /// must be left unchanged in that case.
    fn parse_from_arg(&mut self, arg: &str) -> Result<(), ValueError>;

    /// Upcast used by [`FlagSet::value_as`](crate::FlagSet::value_as).
    fn as_any(&self) -> &dyn Any;
}

/// An integer restricted to an inclusive range.
///
/// # Examples
///
/// ```
/// use flagkit_flags::{BoundedInt, FlagValue, ValueError};
///
/// let mut number = BoundedInt::new(0, 11, 99);
/// number.parse_from_arg("42").unwrap();
/// assert_eq!(number.value(), 42);
///
/// assert!(matches!(
///     number.parse_from_arg("7"),
///     Err(ValueError::BelowMinimum { min: 11, .. })
/// ));
/// assert_eq!(number.value(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedInt {
    value: i64,
    min: i64,
    max: i64,
}

impl BoundedInt {
    /// Creates a bounded integer holding `value` as its default. The default
    /// is not checked against the range.
    pub fn new(value: i64, min: i64, max: i64) -> Self {
        Self { value, min, max }
    }

    /// The current value.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Smallest accepted value.
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Largest accepted value.
    pub fn max(&self) -> i64 {
        self.max
    }
}

impl fmt::Display for BoundedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FlagValue for BoundedInt {
    fn parse_from_arg(&mut self, arg: &str) -> Result<(), ValueError> {
        if arg.is_empty() {
            return Err(ValueError::MissingValue);
        }

        let parsed: i64 = arg.parse().map_err(|source| ValueError::InvalidInteger {
            arg: arg.to_string(),
            source,
        })?;
        if parsed < self.min {
            return Err(ValueError::BelowMinimum {
                min: self.min,
                got: arg.to_string(),
            });
        }
        if parsed > self.max {
            return Err(ValueError::AboveMaximum {
                max: self.max,
                got: arg.to_string(),
            });
        }

        self.value = parsed;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
