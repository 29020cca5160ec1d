//! Error types shared by every stage of icon generation.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while configuring filters or generating icons.
///
/// Configuration errors ([`InvalidColor`](Self::InvalidColor),
/// [`UnknownToken`](Self::UnknownToken), [`MissingProperty`](Self::MissingProperty),
/// [`InvalidProperty`](Self::InvalidProperty)) are raised before any rendering
/// happens. Everything else surfaces from decoding or writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A color string was neither `#RRGGBB`, `#AARRGGBB` nor a decodable integer.
    #[error("invalid color `{0}`")]
    InvalidColor(String),

    /// An enumerated configuration value was not recognized.
    #[error("unknown {kind}: {value}. Use one of [{}]", .expected.join(", "))]
    UnknownToken {
        kind: &'static str,
        value: String,
        expected: Vec<&'static str>,
    },

    /// A required property was absent from a filter's property bag.
    #[error("missing required property `{0}`")]
    MissingProperty(&'static str),

    /// A property was present but had an unusable shape.
    #[error("invalid value for `{key}`: {reason}")]
    InvalidProperty { key: &'static str, reason: String },

    /// A canvas with a zero dimension was requested.
    #[error("cannot allocate a {width}x{height} canvas")]
    EmptyCanvas { width: u32, height: u32 },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The layer-list description could not be serialized.
    #[error("failed to write layer manifest: {0}")]
    Manifest(String),

    /// A single generation task failed; carries enough context to locate it.
    #[error("failed to generate `{icon}`{}: {source}", TaskLocation(.filter, .density))]
    Generation {
        icon: String,
        filter: Option<usize>,
        density: Option<&'static str>,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps this error with the icon (and optionally filter/density) it came from.
    pub fn in_task(self, icon: impl Into<String>, filter: Option<usize>, density: Option<&'static str>) -> Self {
        Error::Generation {
            icon: icon.into(),
            filter,
            density,
            source: Box::new(self),
        }
    }
}

struct TaskLocation<'a>(&'a Option<usize>, &'a Option<&'static str>);

impl fmt::Display for TaskLocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(index) = self.0 {
            write!(f, " (filter #{index}")?;
            if let Some(density) = self.1 {
                write!(f, ", {density}")?;
            }
            write!(f, ")")?;
        } else if let Some(density) = self.1 {
            write!(f, " ({density})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_token_lists_expected_values() {
        let err = Error::UnknownToken {
            kind: "gravity",
            value: "LEFT".into(),
            expected: vec!["TOP", "BOTTOM"],
        };
        assert_eq!(err.to_string(), "unknown gravity: LEFT. Use one of [TOP, BOTTOM]");
    }

    #[test]
    fn generation_error_names_its_task() {
        let err = Error::MissingProperty("file").in_task("ic_launcher", Some(2), Some("xhdpi"));
        assert_eq!(
            err.to_string(),
            "failed to generate `ic_launcher` (filter #2, xhdpi): missing required property `file`"
        );

        let err = Error::MissingProperty("file").in_task("ic_launcher", None, None);
        assert_eq!(
            err.to_string(),
            "failed to generate `ic_launcher`: missing required property `file`"
        );
    }
}
