use flagkit_flags::{
    BoundedInt, COLOR_FORMATS_HELP, ColorString, FilePath, FlagSet, FlagValue, ParseError,
    ParseOutcome, Rgba, UsageConfig, ValueError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn inout() -> FlagSet {
    let mut flags = FlagSet::new("inout", "Given some flags, inout prints the passed values.");
    flags
        .register_flag("color", "Color in hex or rgb format.", ColorString::new(0, 0, 0))
        .unwrap();
    flags
        .register_flag("number", "Number between 11 and 99.", BoundedInt::new(0, 11, 99))
        .unwrap();
    flags
        .register_flag("output", "Output image path.", FilePath::new("out.png", &["png", "jpg"]))
        .unwrap();
    flags.register_short_aliases("color", &['c']).unwrap();
    flags.register_short_aliases("number", &['n']).unwrap();
    flags.register_short_aliases("output", &['o']).unwrap();
    flags
}

fn render(flags: &FlagSet, err: &ParseError) -> String {
    let mut out = Vec::new();
    flags.write_parse_error(&mut out, err).unwrap();
    String::from_utf8(out).unwrap()
}

fn report_values(flags: &FlagSet) -> Vec<String> {
    let mut lines = Vec::new();
    flags
        .for_each_flag(|name, value| {
            if flags.set_by_user(name) {
                lines.push(format!("Value of '--{name}': {value}"));
            } else {
                lines.push(format!("Value of '--{name}': unset"));
            }
            Ok::<(), std::fmt::Error>(())
        })
        .unwrap();
    lines
}

// ---------------------------------------------------------------------------
// Parsing workflow
// ---------------------------------------------------------------------------

#[test]
fn test_full_parse_workflow() {
    let mut flags = inout();
    let outcome = flags
        .parse(["--color", "rgba(0, 255, 0, 128)", "-n=42", "input.txt"])
        .unwrap();
    assert_eq!(outcome, ParseOutcome::Parsed);

    assert_eq!(
        report_values(&flags),
        [
            "Value of '--color': rgba(0, 255, 0, 128)",
            "Value of '--number': 42",
            "Value of '--output': unset",
        ]
    );
    assert_eq!(flags.extra_args(), ["input.txt"]);
    assert_eq!(
        flags.value_as::<ColorString>("color").unwrap().rgba(),
        Rgba {
            r: 0,
            g: 255,
            b: 0,
            a: 128
        }
    );
}

#[test]
fn test_custom_flag_value() {
    #[derive(Debug, Default)]
    struct Words(Vec<String>);

    impl std::fmt::Display for Words {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0.join("+"))
        }
    }

    impl FlagValue for Words {
        fn parse_from_arg(&mut self, arg: &str) -> Result<(), ValueError> {
            if arg.is_empty() {
                return Err(ValueError::Invalid("expected comma separated words".into()));
            }
            self.0 = arg.split(',').map(str::to_string).collect();
            Ok(())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    let mut flags = FlagSet::new("words", "");
    flags.register_flag("words", "Words to join.", Words::default()).unwrap();
    flags.parse(["--words", "a,b,c"]).unwrap();
    assert_eq!(flags.value("words").unwrap().to_string(), "a+b+c");
    assert_eq!(flags.value_as::<Words>("words").unwrap().0.len(), 3);

    let mut flags = FlagSet::new("words", "");
    flags.register_flag("words", "Words to join.", Words::default()).unwrap();
    let err = flags.parse(["--words"]).unwrap_err();
    assert_eq!(
        render(&flags, &err),
        "Failed to parse '--words' argument:\n\
         \texpected comma separated words\n\
         Further help: words --help\n"
    );
}

// ---------------------------------------------------------------------------
// Error reports
// ---------------------------------------------------------------------------

#[test]
fn test_typo_report_suggests_flag() {
    let mut flags = inout();
    let err = flags.parse(["--colour", "#fff"]).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownFlag {
            flag: "--colour".into(),
            suggestion: Some("color".into())
        }
    );
    assert!(render(&flags, &err).contains("(Maybe you meant '--color'?)\n"));
}

#[test]
fn test_invalid_color_report_wraps_detail() {
    let mut flags = inout();
    let err = flags.parse(["-c", "rgb 1, 2, 3"]).unwrap_err();
    assert_eq!(
        render(&flags, &err),
        "Failed to parse '-c rgb 1, 2, 3' arguments:\n\
         \texpected symmetric braces surrounding the color channel values (e.g.\n\
         \t\"rgb(200, 128, 0)\")\n\
         Further help: inout --help\n"
    );
}

#[test]
fn test_extension_report() {
    let mut flags = inout();
    let err = flags.parse(["--output", "image.gif"]).unwrap_err();
    assert!(matches!(
        err,
        ParseError::InvalidValue {
            source: ValueError::WrongExtension { .. },
            ..
        }
    ));
    assert!(render(&flags, &err).contains("\tfile path must end with png or jpg\n"));
}

// ---------------------------------------------------------------------------
// Usage rendering
// ---------------------------------------------------------------------------

#[test]
fn test_usage_with_color_help_section() {
    let mut flags = inout();
    flags.add_usage_section(COLOR_FORMATS_HELP);

    let mut out = Vec::new();
    flags.write_help(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("Given some flags, inout prints the passed values.\n\nUsage of inout:\n"));
    assert!(text.contains("\t--color, -c     Color in hex or rgb format.\n"));
    assert!(text.contains("\t--output, -o    Output image path.\n"));
    assert!(text.contains("\n- Hexadecimal: "));
    for line in text.lines() {
        assert!(line.chars().count() <= 80, "line too wide: {line:?}");
    }
}

#[test]
fn test_usage_respects_loaded_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("usage.yml");
    std::fs::write(&path, "line_width: 40\nlong_description_width: 20\n").unwrap();

    let config = UsageConfig::load(&path).unwrap();
    let flags = inout().with_config(config);

    let mut out = Vec::new();
    flags.write_usage(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    // 40 - 4 - 4 leaves 32 columns, enough for the output flag only.
    assert!(text.contains("\t--output, -o    Output image path.\n"));
    assert!(text.contains("\t--color, -c\n\t     Color in hex or rgb\n\t     format.\n"));
    assert!(text.ends_with("\t--number, -n\n\t     Number between 11\n\t     and 99.\n"));
}
