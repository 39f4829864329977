//! Flag registry and command-line parsing.
//!
//! A [`FlagSet`] owns every registered flag value. Parsing writes directly
//! into those values and records which flags the user set; callers read them
//! back with [`FlagSet::value_as`] once parsing succeeds.

use std::collections::BTreeMap;

use flagkit_core::{DistanceEngine, closest_match};
use tracing::debug;

use crate::config::UsageConfig;
use crate::error::{ParseError, RegistrationError};
use crate::value::FlagValue;

/// A registered flag.
#[derive(Debug)]
pub(crate) struct Flag {
    pub(crate) value: Box<dyn FlagValue>,
    pub(crate) usage: String,
    pub(crate) set_by_user: bool,
}

/// Result of a successful [`FlagSet::parse`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// All arguments were consumed.
    Parsed,
    /// `-h`, `--help` or `/?` was found; the remaining arguments were not
    /// looked at.
    HelpRequested,
}

/// A set of long flags with optional single-letter aliases.
///
/// # Examples
///
/// ```
/// use flagkit_flags::{BoundedInt, FlagSet, ParseOutcome};
///
/// let mut flags = FlagSet::new("inout", "Sample program.");
/// flags.register_flag("number", "A number between 11 and 99.", BoundedInt::new(20, 11, 99))?;
/// flags.register_short_aliases("number", &['n'])?;
///
/// assert_eq!(flags.parse(["-n", "42", "extra"])?, ParseOutcome::Parsed);
/// assert_eq!(flags.value_as::<BoundedInt>("number").unwrap().value(), 42);
/// assert!(flags.set_by_user("number"));
/// assert_eq!(flags.extra_args(), ["extra"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct FlagSet {
    pub(crate) program_name: String,
    pub(crate) help_description: String,
    pub(crate) flags: BTreeMap<String, Flag>,
    pub(crate) short_aliases: BTreeMap<char, String>,
    pub(crate) extra_args: Vec<String>,
    pub(crate) extra_args_disallowed: bool,
    pub(crate) usage_sections: Vec<String>,
    pub(crate) config: UsageConfig,
    engine: DistanceEngine,
}

impl FlagSet {
    /// Creates an empty set. `program_name` appears in usage and error
    /// output; `help_description` is printed above the usage on `--help`.
    pub fn new(program_name: impl Into<String>, help_description: impl Into<String>) -> Self {
        Self {
            program_name: program_name.into(),
            help_description: help_description.into(),
            flags: BTreeMap::new(),
            short_aliases: BTreeMap::new(),
            extra_args: Vec::new(),
            extra_args_disallowed: false,
            usage_sections: Vec::new(),
            config: UsageConfig::default(),
            engine: DistanceEngine::new(),
        }
    }

    /// Replaces the layout configuration.
    pub fn with_config(mut self, config: UsageConfig) -> Self {
        self.config = config;
        self
    }

    /// Program name used in messages.
    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    /// Layout configuration.
    pub fn config(&self) -> &UsageConfig {
        &self.config
    }

    /// Registers a long flag, given without its leading `--`.
    ///
    /// # Errors
    ///
    /// Fails if the name is shorter than two code points, starts with a
    /// dash, or is already registered.
    pub fn register_flag(
        &mut self,
        long_name: &str,
        usage: &str,
        value: impl FlagValue,
    ) -> Result<(), RegistrationError> {
        if long_name.chars().nth(1).is_none() {
            return Err(RegistrationError::NameTooShort(long_name.to_string()));
        }
        if long_name.starts_with('-') {
            return Err(RegistrationError::LeadingDash(long_name.to_string()));
        }
        if self.is_registered(long_name) {
            return Err(RegistrationError::AlreadyRegistered(long_name.to_string()));
        }

        self.flags.insert(
            long_name.to_string(),
            Flag {
                value: Box::new(value),
                usage: usage.to_string(),
                set_by_user: false,
            },
        );
        Ok(())
    }

    /// Registers single-letter aliases (`-c`) for a registered long flag.
    ///
    /// Aliases are validated before any is registered, so a failed call
    /// leaves the set unchanged.
    ///
    /// # Errors
    ///
    /// Fails if the flag is unknown, or an alias is a dash, whitespace or a
    /// control character, or is already taken.
    pub fn register_short_aliases(
        &mut self,
        long_name: &str,
        aliases: &[char],
    ) -> Result<(), RegistrationError> {
        if !self.is_registered(long_name) {
            return Err(RegistrationError::UnknownFlag(long_name.to_string()));
        }

        for (i, &alias) in aliases.iter().enumerate() {
            if alias == '-' || alias.is_whitespace() || alias.is_control() {
                return Err(RegistrationError::InvalidAlias(alias));
            }
            let existing = self
                .short_aliases
                .get(&alias)
                .map(String::as_str)
                .or_else(|| aliases[..i].contains(&alias).then_some(long_name));
            match existing {
                Some(existing) if existing == long_name => {
                    return Err(RegistrationError::DuplicateAlias {
                        alias,
                        flag: long_name.to_string(),
                    });
                }
                Some(existing) => {
                    return Err(RegistrationError::AliasTaken {
                        alias,
                        flag: long_name.to_string(),
                        existing: existing.to_string(),
                    });
                }
                None => {}
            }
        }

        for &alias in aliases {
            self.short_aliases.insert(alias, long_name.to_string());
        }
        Ok(())
    }

    /// Whether `long_name` is a registered flag. Aliases are not matched;
    /// see [`alias_to_flag`](Self::alias_to_flag).
    pub fn is_registered(&self, long_name: &str) -> bool {
        self.flags.contains_key(long_name)
    }

    /// The long flag name an alias points at.
    pub fn alias_to_flag(&self, alias: char) -> Option<&str> {
        self.short_aliases.get(&alias).map(String::as_str)
    }

    /// Aliases registered for a flag, in alphabetical order.
    pub fn aliases_of(&self, long_name: &str) -> Vec<char> {
        self.short_aliases
            .iter()
            .filter(|(_, flag)| flag.as_str() == long_name)
            .map(|(&alias, _)| alias)
            .collect()
    }

    /// The value of a flag: the parsed one if the user set it, the default
    /// otherwise.
    pub fn value(&self, long_name: &str) -> Option<&dyn FlagValue> {
        self.flags.get(long_name).map(|flag| flag.value.as_ref())
    }

    /// The value of a flag as its concrete type. `None` if the flag is
    /// unknown or holds another type.
    pub fn value_as<T: FlagValue>(&self, long_name: &str) -> Option<&T> {
        self.value(long_name)?.as_any().downcast_ref::<T>()
    }

    /// Whether the user passed the flag. Unknown flags are never set.
    pub fn set_by_user(&self, long_name: &str) -> bool {
        self.flags.get(long_name).is_some_and(|flag| flag.set_by_user)
    }

    /// Whether the user passed any of the flags.
    pub fn any_set_by_user(&self, long_names: &[&str]) -> bool {
        long_names.iter().any(|name| self.set_by_user(name))
    }

    /// Whether the user passed all of the flags.
    pub fn all_set_by_user(&self, long_names: &[&str]) -> bool {
        long_names.iter().all(|name| self.set_by_user(name))
    }

    /// Positional arguments collected by [`parse`](Self::parse).
    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }

    /// Calls `f` with every flag name and value, alphabetically, stopping at
    /// the first error.
    pub fn for_each_flag<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&str, &dyn FlagValue) -> Result<(), E>,
    {
        for (name, flag) in &self.flags {
            f(name, flag.value.as_ref())?;
        }
        Ok(())
    }

    /// Makes positional arguments a parse error.
    pub fn disallow_extra_args(&mut self) {
        self.extra_args_disallowed = true;
    }

    /// Adds a paragraph printed after the flag list in usage output.
    pub fn add_usage_section(&mut self, paragraph: impl Into<String>) {
        self.usage_sections.push(paragraph.into());
    }

    /// The registered long name most likely meant by `long_name`.
    pub fn find_close_flag_name(&self, long_name: &str) -> Option<&str> {
        closest_match(&self.engine, long_name, self.flags.keys().map(String::as_str))
            .map(|suggestion| suggestion.candidate)
    }

    /// Parses command-line arguments, excluding the program name.
    ///
    /// Accepted forms are `--name value`, `--name=value`, `-c value` and
    /// `-c=value`. A flag given last is parsed from an empty argument. A
    /// lone `-` is a positional argument, and everything after `--` is
    /// positional too.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] found. Flags parsed before it keep
    /// their new values.
    pub fn parse<I, S>(&mut self, args: I) -> Result<ParseOutcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        debug!(program = %self.program_name, count = args.len(), "Parsing arguments");

        let mut index = 0;
        while index < args.len() {
            let arg = &args[index];
            if arg == "-h" || arg == "--help" || arg == "/?" {
                debug!(arg = %arg, "Help requested");
                return Ok(ParseOutcome::HelpRequested);
            }

            if arg == "--" {
                for extra in &args[index + 1..] {
                    self.push_extra_arg(extra)?;
                }
                break;
            }

            if let Some(body) = arg.strip_prefix("--") {
                let (name, inline) = split_inline_value(body);
                if !self.is_registered(name) {
                    let suggestion = if name.is_empty() {
                        None
                    } else {
                        self.find_close_flag_name(name).map(str::to_string)
                    };
                    return Err(ParseError::UnknownFlag {
                        flag: format!("--{name}"),
                        suggestion,
                    });
                }
                let typed = format!("--{name}");
                self.apply_flag(&typed, name.to_string(), inline, &args, &mut index)?;
            } else if let Some(body) = arg.strip_prefix('-').filter(|b| !b.is_empty()) {
                let (letters, inline) = split_inline_value(body);
                let mut chars = letters.chars();
                let alias = match (chars.next(), chars.next()) {
                    (Some(alias), None) => alias,
                    (Some(_), Some(_)) => {
                        return Err(ParseError::MultiLetterShortFlag { flag: arg.clone() });
                    }
                    (None, _) => {
                        return Err(ParseError::UnknownAlias { flag: arg.clone() });
                    }
                };
                let Some(name) = self.alias_to_flag(alias).map(str::to_string) else {
                    return Err(ParseError::UnknownAlias {
                        flag: format!("-{alias}"),
                    });
                };
                let typed = format!("-{alias}");
                self.apply_flag(&typed, name, inline, &args, &mut index)?;
            } else {
                self.push_extra_arg(arg)?;
            }

            index += 1;
        }

        Ok(ParseOutcome::Parsed)
    }

    /// Parses the value of a registered flag, taking it from `inline` or
    /// from the next argument.
    fn apply_flag(
        &mut self,
        typed: &str,
        name: String,
        inline: Option<&str>,
        args: &[String],
        index: &mut usize,
    ) -> Result<(), ParseError> {
        let Some(flag) = self.flags.get_mut(&name) else {
            return Err(ParseError::UnknownFlag {
                flag: typed.to_string(),
                suggestion: None,
            });
        };
        if flag.set_by_user {
            return Err(ParseError::DuplicateFlag {
                flag: typed.to_string(),
            });
        }

        let value = match inline {
            Some(value) => value,
            None if *index + 1 < args.len() => {
                *index += 1;
                args[*index].as_str()
            }
            None => "",
        };

        if let Err(source) = flag.value.parse_from_arg(value) {
            debug!(flag = %name, value, error = %source, "Rejected flag value");
            return Err(ParseError::InvalidValue {
                flag: typed.to_string(),
                value: (!value.is_empty()).then(|| value.to_string()),
                source,
            });
        }

        flag.set_by_user = true;
        debug!(flag = %name, value, "Parsed flag");
        Ok(())
    }

    fn push_extra_arg(&mut self, arg: &str) -> Result<(), ParseError> {
        if self.extra_args_disallowed {
            return Err(ParseError::UnexpectedArgument {
                arg: arg.to_string(),
            });
        }
        debug!(arg, "Extra argument");
        self.extra_args.push(arg.to_string());
        Ok(())
    }
}

/// Splits `name=value` at the first `=`.
fn split_inline_value(body: &str) -> (&str, Option<&str>) {
    match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    }
}
