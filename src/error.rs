//! Error types for conversion.

/// Errors that can occur while converting between BBCode and HTML.
///
/// A rule that does not recognize its input is not an error; it abstains
/// and the element falls through to the next rule.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The tag tree did not have the shape a transform promised to produce.
    ///
    /// This points at a bug in a tag transform or in the tokenizer, never at
    /// bad user input.
    #[error("malformed tag tree: {0}")]
    MalformedTree(String),

    /// Writing rendered output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendered HTML was not valid UTF-8.
    #[error("rendered output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
