//! Usage screens, error reports and the process exit glue.
//!
//! Everything here renders into any [`Write`] so output can be captured in
//! tests; the `*_or_exit`, [`fatal`](FlagSet::fatal) and
//! [`usage_fail`](FlagSet::usage_fail) helpers bind the renderers to the
//! standard streams and terminate the process.

use std::borrow::Cow;
use std::fmt::Display;
use std::io::{self, Write};
use std::process;

use flagkit_core::{Split, optimal_breakpoint, wrap};
use tracing::debug;

use crate::error::{FATAL_EXIT_CODE, ParseError, USAGE_EXIT_CODE};
use crate::flagset::{FlagSet, ParseOutcome};

const FATAL_PREFIX: &str = "Fatal error: ";

/// Replaces characters the paragraph wrapper rejects. Tabs become spaces,
/// other control characters become U+FFFD.
fn sanitize(text: &str) -> Cow<'_, str> {
    let is_bad = |c: char| c != '\n' && (c < ' ' || c == '\u{7f}');
    if !text.contains(is_bad) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| match c {
                '\t' => ' ',
                c if is_bad(c) => '\u{FFFD}',
                c => c,
            })
            .collect(),
    )
}

/// Writes `text` wrapped at `width`, each line preceded by `prefix`.
fn write_wrapped(out: &mut impl Write, text: &str, width: usize, prefix: &str) -> io::Result<()> {
    wrap(&sanitize(text), width, |line| writeln!(out, "{prefix}{line}"))
}

/// Logs a write error on a path that exits without returning it.
fn log_write_failure(result: io::Result<()>, output: &str) {
    if let Err(err) = result {
        debug!(error = %err, output, "Failed to write output");
    }
}

fn saturating_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Label printed in the flag column: `--name, -a, -b`.
fn flag_label(name: &str, aliases: &[char]) -> String {
    let mut label = format!("--{name}");
    for alias in aliases {
        label.push_str(", -");
        label.push(*alias);
    }
    label
}

impl FlagSet {
    /// Writes the usage screen: flags in alphabetical order, then any extra
    /// usage sections.
    ///
    /// Flags whose label and description fit on one line share a column
    /// chosen to keep as many of them single-line as possible. The rest are
    /// printed afterwards with their description wrapped below the label.
    pub fn write_usage(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Usage of {}:", self.program_name)?;

        let entries: Vec<(String, &str, Split)> = self
            .flags
            .iter()
            .map(|(name, flag)| {
                let label = flag_label(name, &self.aliases_of(name));
                let description = if flag.usage.contains('\n') {
                    u16::MAX
                } else {
                    saturating_u16(flag.usage.chars().count())
                };
                let split = Split::new(saturating_u16(label.chars().count()), description);
                (label, flag.usage.as_str(), split)
            })
            .collect();

        let content_width = saturating_u16(self.config.content_width());
        let splits: Vec<Split> = entries.iter().map(|(_, _, split)| *split).collect();
        let column = optimal_breakpoint(&splits, content_width);
        debug!(flags = entries.len(), column, content_width, "Laying out usage");

        for (label, usage, split) in &entries {
            if split.fits_at(column, content_width) {
                let padding = usize::from(column - split.label) + self.config.column_spacing;
                writeln!(out, "\t{label}{:padding$}{}", "", sanitize(usage))?;
            }
        }

        let indent = format!("\t{:1$}", "", self.config.description_indent);
        for (label, usage, split) in &entries {
            if !split.fits_at(column, content_width) {
                writeln!(out, "\t{label}")?;
                write_wrapped(out, usage, self.config.long_description_width, &indent)?;
            }
        }

        for section in &self.usage_sections {
            writeln!(out)?;
            write_wrapped(out, section, self.config.line_width, "")?;
        }
        Ok(())
    }

    /// Writes the help description, a blank line and the usage screen.
    pub fn write_help(&self, out: &mut impl Write) -> io::Result<()> {
        if !self.help_description.is_empty() {
            write_wrapped(out, &self.help_description, self.config.line_width, "")?;
            writeln!(out)?;
        }
        self.write_usage(out)
    }

    /// Writes a report for a failed [`parse`](FlagSet::parse), ending with a
    /// pointer to `--help`.
    pub fn write_parse_error(&self, out: &mut impl Write, err: &ParseError) -> io::Result<()> {
        let width = self.config.message_width;
        match err {
            ParseError::UnknownFlag { flag, suggestion } => {
                writeln!(out, "Failed to parse '{flag}' argument:")?;
                writeln!(out, "\tflag name not recognized")?;
                if let Some(name) = suggestion {
                    writeln!(out, "(Maybe you meant '--{name}'?)")?;
                }
                writeln!(out)?;
            }
            ParseError::UnknownAlias { flag } => {
                writeln!(out, "Failed to parse '{flag}' argument:")?;
                writeln!(out, "\tshort flag not recognized")?;
            }
            ParseError::MultiLetterShortFlag { flag } => {
                writeln!(out, "Failed to parse '{flag}' argument:")?;
                writeln!(out, "\tmulti-letter flags not allowed for single dash flags")?;
            }
            ParseError::DuplicateFlag { flag } => {
                writeln!(out, "Duplicated flag '{flag}'. Program flags can't be repeated.")?;
            }
            ParseError::InvalidValue {
                flag,
                value: Some(value),
                source,
            } => {
                writeln!(out, "Failed to parse '{flag} {}' arguments:", sanitize(value))?;
                write_wrapped(out, &source.to_string(), width, "\t")?;
            }
            ParseError::InvalidValue {
                flag,
                value: None,
                source,
            } => {
                writeln!(out, "Failed to parse '{flag}' argument:")?;
                write_wrapped(out, &source.to_string(), width, "\t")?;
            }
            ParseError::UnexpectedArgument { arg } => {
                writeln!(out, "Unexpected '{}' argument.", sanitize(arg))?;
            }
        }
        writeln!(out, "Further help: {} --help", self.program_name)
    }

    /// Writes `Warning: msg`.
    pub fn write_warning(&self, out: &mut impl Write, msg: &str) -> io::Result<()> {
        writeln!(out, "Warning: {}", sanitize(msg))
    }

    /// Writes a fatal error message. Short messages stay on the
    /// `Fatal error:` line; longer ones are wrapped below it.
    pub fn write_fatal(&self, out: &mut impl Write, msg: &str) -> io::Result<()> {
        let msg = sanitize(msg);
        let inline_width = self.config.line_width.saturating_sub(FATAL_PREFIX.len());
        if !msg.contains('\n') && msg.chars().count() <= inline_width {
            return writeln!(out, "{FATAL_PREFIX}{msg}");
        }
        writeln!(out, "Fatal error:")?;
        write_wrapped(out, &msg, self.config.message_width, "\t")
    }

    /// Writes an invalid usage report followed by the usage screen.
    pub fn write_usage_failure(&self, out: &mut impl Write, msg: &str) -> io::Result<()> {
        writeln!(out, "Invalid usage:")?;
        write_wrapped(out, msg, self.config.message_width, "\t")?;
        writeln!(out)?;
        self.write_usage(out)
    }

    /// Parses `args`, printing help and exiting with `0` if requested, or
    /// printing the error and exiting with `2` on failure.
    pub fn parse_or_exit<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.parse(args) {
            Ok(ParseOutcome::Parsed) => {}
            Ok(ParseOutcome::HelpRequested) => {
                log_write_failure(self.write_help(&mut io::stdout().lock()), "help");
                process::exit(0);
            }
            Err(err) => {
                log_write_failure(self.write_parse_error(&mut io::stderr().lock(), &err), "parse error");
                process::exit(err.exit_code());
            }
        }
    }

    /// [`parse_or_exit`](Self::parse_or_exit) over the process arguments.
    /// Arguments that are not valid Unicode are converted lossily.
    pub fn parse_env_or_exit(&mut self) {
        self.parse_or_exit(
            std::env::args_os()
                .skip(1)
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
    }

    /// Prints a warning to stderr.
    pub fn warn(&self, msg: impl Display) {
        log_write_failure(self.write_warning(&mut io::stderr().lock(), &msg.to_string()), "warning");
    }

    /// Prints a fatal error to stderr and exits with `1`.
    pub fn fatal(&self, msg: impl Display) -> ! {
        log_write_failure(self.write_fatal(&mut io::stderr().lock(), &msg.to_string()), "fatal error");
        process::exit(FATAL_EXIT_CODE)
    }

    /// Prints an invalid usage report and the usage screen to stderr, then
    /// exits with `2`.
    pub fn usage_fail(&self, msg: impl Display) -> ! {
        log_write_failure(self.write_usage_failure(&mut io::stderr().lock(), &msg.to_string()), "usage failure");
        process::exit(USAGE_EXIT_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoundedInt, ColorString, UsageConfig};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample_set() -> FlagSet {
        let mut flags = FlagSet::new("inout", "Given some flags, inout prints the passed values.");
        flags
            .register_flag("color", "Color in hex or rgb format.", ColorString::new(0, 0, 0))
            .unwrap();
        flags
            .register_flag("number", "Number between 11 and 99.", BoundedInt::new(0, 11, 99))
            .unwrap();
        flags.register_short_aliases("color", &['c']).unwrap();
        flags.register_short_aliases("number", &['n']).unwrap();
        flags
    }

    #[test]
    fn test_sanitize_replaces_control_characters() {
        assert!(matches!(sanitize("plain\ntext"), Cow::Borrowed(_)));
        assert_eq!(sanitize("a\tb\u{1b}c\u{7f}"), "a b\u{FFFD}c\u{FFFD}");
    }

    #[test]
    fn test_usage_aligns_short_entries() {
        let out = render(|out| sample_set().write_usage(out));
        assert_eq!(
            out,
            "Usage of inout:\n\
             \t--color, -c     Color in hex or rgb format.\n\
             \t--number, -n    Number between 11 and 99.\n"
        );
    }

    #[test]
    fn test_usage_moves_long_entries_below() {
        let mut flags = sample_set();
        let long = "Path to the file where the rendered output is written. Existing files are replaced without asking.";
        flags
            .register_flag("output", long, BoundedInt::new(0, 0, 1))
            .unwrap();
        flags.add_usage_section("Additional usage section.");

        let out = render(|out| flags.write_usage(out));
        assert_eq!(
            out,
            "Usage of inout:\n\
             \t--color, -c     Color in hex or rgb format.\n\
             \t--number, -n    Number between 11 and 99.\n\
             \t--output\n\
             \t     Path to the file where the rendered output is written. Existing files\n\
             \t     are replaced without asking.\n\
             \n\
             Additional usage section.\n"
        );
    }

    #[test]
    fn test_usage_with_custom_spacing() {
        let flags = sample_set().with_config(UsageConfig {
            column_spacing: 1,
            ..UsageConfig::default()
        });
        let out = render(|out| flags.write_usage(out));
        assert!(out.contains("\t--color, -c  Color in hex or rgb format.\n"));
        assert!(out.contains("\t--number, -n Number between 11 and 99.\n"));
    }

    #[test]
    fn test_help_prepends_description() {
        let out = render(|out| sample_set().write_help(out));
        assert!(out.starts_with(
            "Given some flags, inout prints the passed values.\n\nUsage of inout:\n"
        ));
    }

    #[test]
    fn test_parse_error_with_suggestion() {
        let mut flags = sample_set();
        let err = flags.parse(["--nubmer", "12"]).unwrap_err();
        let out = render(|out| flags.write_parse_error(out, &err));
        assert_eq!(
            out,
            "Failed to parse '--nubmer' argument:\n\
             \tflag name not recognized\n\
             (Maybe you meant '--number'?)\n\
             \n\
             Further help: inout --help\n"
        );
    }

    #[test]
    fn test_parse_error_for_values() {
        let mut flags = sample_set();
        let err = flags.parse(["-n", "7"]).unwrap_err();
        let out = render(|out| flags.write_parse_error(out, &err));
        assert_eq!(
            out,
            "Failed to parse '-n 7' arguments:\n\
             \tminimum value is '11', but got '7' instead\n\
             Further help: inout --help\n"
        );

        let mut flags = sample_set();
        let err = flags.parse(["--color"]).unwrap_err();
        let out = render(|out| flags.write_parse_error(out, &err));
        assert!(out.starts_with("Failed to parse '--color' argument:\n\t"));
    }

    #[test]
    fn test_parse_error_for_duplicates_and_extra_args() {
        let mut flags = sample_set();
        let err = flags.parse(["-n", "12", "--number", "13"]).unwrap_err();
        let out = render(|out| flags.write_parse_error(out, &err));
        assert_eq!(
            out,
            "Duplicated flag '--number'. Program flags can't be repeated.\n\
             Further help: inout --help\n"
        );

        let mut flags = sample_set();
        flags.disallow_extra_args();
        let err = flags.parse(["stray"]).unwrap_err();
        let out = render(|out| flags.write_parse_error(out, &err));
        assert!(out.starts_with("Unexpected 'stray' argument.\n"));
    }

    #[test]
    fn test_fatal_short_and_long() {
        let flags = sample_set();
        let out = render(|out| flags.write_fatal(out, "disk full"));
        assert_eq!(out, "Fatal error: disk full\n");

        let msg = "x".repeat(67);
        let out = render(|out| flags.write_fatal(out, &msg));
        assert_eq!(out, format!("Fatal error: {msg}\n"));

        let msg = "failed to write the rendered image to disk because the target directory vanished";
        let out = render(|out| flags.write_fatal(out, msg));
        assert_eq!(
            out,
            "Fatal error:\n\
             \tfailed to write the rendered image to disk because the target directory\n\
             \tvanished\n"
        );
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failures_are_reported_not_dropped() {
        let flags = sample_set();
        let err = flags.write_warning(&mut ClosedPipe, "cache stale").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        let err = flags.write_fatal(&mut ClosedPipe, "disk full").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        // Logging a failed write must not panic.
        log_write_failure(flags.write_usage_failure(&mut ClosedPipe, "bad"), "usage failure");
        log_write_failure(flags.write_help(&mut ClosedPipe), "help");
        log_write_failure(Ok(()), "help");
    }

    #[test]
    fn test_warning_and_usage_failure() {
        let flags = sample_set();
        let out = render(|out| flags.write_warning(out, "cache\u{7}stale"));
        assert_eq!(out, "Warning: cache\u{FFFD}stale\n");

        let out = render(|out| flags.write_usage_failure(out, "--color requires --number"));
        assert!(out.starts_with("Invalid usage:\n\t--color requires --number\n\nUsage of inout:\n"));
    }
}
