//! Flag registration, argument parsing and usage rendering.
//!
//! This crate wires the algorithms from `flagkit_core` into a small flag
//! parser for command-line programs: values are registered on a
//! [`FlagSet`], parsed from the command line, and read back with their
//! concrete types. Usage screens and error reports are laid out with the
//! breakpoint optimizer and the paragraph wrapper.
//!
//! # Quick start
//!
//! ```
//! use flagkit_flags::{BoundedInt, ColorString, FlagSet, ParseOutcome, COLOR_FORMATS_HELP};
//!
//! let mut flags = FlagSet::new("inout", "Given some flags, inout prints the passed values.");
//! flags.register_flag("color", "Color in hex or rgb format.", ColorString::new(0, 0, 0))?;
//! flags.register_flag("number", "Number between 11 and 99.", BoundedInt::new(0, 11, 99))?;
//! flags.register_short_aliases("color", &['c'])?;
//! flags.add_usage_section(COLOR_FORMATS_HELP);
//!
//! match flags.parse(["-c", "#FF8000", "--number=42"]) {
//!     Ok(ParseOutcome::Parsed) => {}
//!     Ok(ParseOutcome::HelpRequested) => flags.write_help(&mut std::io::stdout())?,
//!     Err(err) => flags.write_parse_error(&mut std::io::stderr(), &err)?,
//! }
//!
//! let color = flags.value_as::<ColorString>("color").unwrap();
//! assert_eq!(color.to_string(), "rgb(255, 128, 0)");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Programs that just want the conventional behavior call
//! [`FlagSet::parse_env_or_exit`], which prints help or errors and exits
//! with `0` or `2` by itself.

mod color;
mod config;
mod error;
mod flagset;
mod path;
mod usage;
mod value;

pub use color::{COLOR_FORMATS_HELP, ColorString, Rgba, char_name, parse_color};
pub use config::UsageConfig;
pub use error::{
    ConfigError, FATAL_EXIT_CODE, ParseError, RegistrationError, USAGE_EXIT_CODE, ValueError,
};
pub use flagset::{FlagSet, ParseOutcome};
pub use path::FilePath;
pub use value::{BoundedInt, FlagValue};
