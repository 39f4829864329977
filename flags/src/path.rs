//! File path flag values.

use std::any::Any;
use std::fmt;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::error::ValueError;
use crate::value::FlagValue;

#[cfg(windows)]
const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
const PATH_LIST_SEPARATOR: char = ':';

/// A file path flag value, optionally restricted to a set of extensions.
///
/// Accepted paths are made absolute when the current directory is
/// available, and kept as given otherwise.
///
/// # Examples
///
/// ```
/// use flagkit_flags::{FilePath, FlagValue};
///
/// let mut output = FilePath::new("out.png", &["png", "jpg"]);
/// output.parse_from_arg("renders/final.jpg").unwrap();
/// assert!(output.value().is_absolute());
/// assert_eq!(output.reference(), "renders/final.jpg");
///
/// let err = output.parse_from_arg("final.gif").unwrap_err();
/// assert_eq!(err.to_string(), "file path must end with png or jpg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePath {
    value: PathBuf,
    allowed_extensions: Vec<String>,
}

impl FilePath {
    /// Creates a path value with a default. Extensions are given without
    /// the leading dot; an empty list accepts any extension.
    pub fn new(default: impl Into<PathBuf>, allowed_extensions: &[&str]) -> Self {
        Self {
            value: default.into(),
            allowed_extensions: allowed_extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// The current path.
    pub fn value(&self) -> &Path {
        &self.value
    }

    /// Accepted extensions, without dots.
    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Short form of the path for console messages: the parent directory
    /// name and the file name, e.g. `renders/final.png`.
    pub fn reference(&self) -> String {
        let name = self
            .value
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self.value.parent().and_then(Path::file_name) {
            Some(dir) => format!("{}{MAIN_SEPARATOR}{name}", dir.to_string_lossy()),
            None => name,
        }
    }

    fn extension_error(&self) -> ValueError {
        let expected = match self.allowed_extensions.as_slice() {
            [only] => format!("'{only}'"),
            [init @ .., last] => format!("{} or {last}", init.join(", ")),
            [] => String::new(),
        };
        ValueError::WrongExtension { expected }
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.display())
    }
}

impl FlagValue for FilePath {
    fn parse_from_arg(&mut self, arg: &str) -> Result<(), ValueError> {
        if arg.is_empty() {
            return Err(ValueError::MissingValue);
        }
        if arg.ends_with(['.', MAIN_SEPARATOR, PATH_LIST_SEPARATOR]) {
            return Err(ValueError::NotAPath);
        }
        if !self.allowed_extensions.is_empty()
            && !self
                .allowed_extensions
                .iter()
                .any(|ext| arg.strip_suffix(ext.as_str()).is_some_and(|s| s.ends_with('.')))
        {
            return Err(self.extension_error());
        }

        self.value = std::path::absolute(arg).unwrap_or_else(|_| PathBuf::from(arg));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_directory_like_values() {
        let mut path = FilePath::new("a.txt", &[]);
        assert_eq!(path.parse_from_arg(""), Err(ValueError::MissingValue));
        assert_eq!(path.parse_from_arg("dir."), Err(ValueError::NotAPath));
        let dir = format!("dir{MAIN_SEPARATOR}");
        assert_eq!(path.parse_from_arg(&dir), Err(ValueError::NotAPath));
        let list = format!("a{PATH_LIST_SEPARATOR}");
        assert_eq!(path.parse_from_arg(&list), Err(ValueError::NotAPath));
        assert_eq!(path.value(), Path::new("a.txt"));
    }

    #[test]
    fn test_extension_messages() {
        let mut single = FilePath::new("", &["png"]);
        assert_eq!(
            single.parse_from_arg("image.jpg").unwrap_err().to_string(),
            "file path must end with 'png'"
        );

        let mut several = FilePath::new("", &["png", "jpg", "gif"]);
        assert_eq!(
            several.parse_from_arg("image.bmp").unwrap_err().to_string(),
            "file path must end with png, jpg or gif"
        );
    }

    #[test]
    fn test_extension_needs_dot() {
        let mut path = FilePath::new("", &["png"]);
        assert!(path.parse_from_arg("imagepng").is_err());
        assert!(path.parse_from_arg("image.png").is_ok());
    }

    #[test]
    fn test_accepted_value_is_absolute() {
        let mut path = FilePath::new("", &[]);
        path.parse_from_arg("some/dir/file.txt").unwrap();
        assert!(path.value().is_absolute());
        assert!(path.value().ends_with("some/dir/file.txt"));
        assert_eq!(path.reference(), format!("dir{MAIN_SEPARATOR}file.txt"));
    }

    #[test]
    fn test_reference_without_parent() {
        let path = FilePath::new("file.txt", &[]);
        assert_eq!(path.reference(), "file.txt");
    }
}
