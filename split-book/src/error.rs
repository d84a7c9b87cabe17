use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Could not read {}: {reason}", path.display())]
    ReadFailure { path: PathBuf, reason: String },

    #[error("Insufficient structure: {reason}")]
    InsufficientStructure { reason: String },

    #[error("Title not found in body text: \"{title}\"")]
    TitleNotFound { title: String },

    #[error("Section \"{title}\" is too short ({words} words, minimum {min_words})")]
    DegenerateSection {
        title: String,
        words: usize,
        min_words: usize,
    },

    #[error("Failed to write {} ({written} of {total} sections written): {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        written: usize,
        total: usize,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SplitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SplitError::TitleNotFound {
            title: "Preface".into(),
        };
        assert_eq!(err.to_string(), "Title not found in body text: \"Preface\"");

        let err = SplitError::DegenerateSection {
            title: "Notes".into(),
            words: 3,
            min_words: 50,
        };
        assert!(err.to_string().contains("3 words, minimum 50"));
    }

    #[test]
    fn test_write_failure_message() {
        let err = SplitError::WriteFailure {
            path: PathBuf::from("/out/03_Part.txt"),
            written: 2,
            total: 5,
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("03_Part.txt"));
        assert!(message.contains("2 of 5"));
    }
}
