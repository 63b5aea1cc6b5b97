use std::path::PathBuf;

use thiserror::Error;

pub type CardResult<T> = Result<T, CardError>;

/// Failures raised while building a single card.
///
/// Every variant is fatal to the card being built and never to the batch;
/// the batch driver logs it and moves to the next record.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("missing asset {}: {source}", path.display())]
    MissingAsset {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no style registered for suit '{suit}'")]
    StyleLookup { suit: String },

    #[error("font error {}: {reason}", path.display())]
    Font { path: PathBuf, reason: String },

    #[error("record error: {0}")]
    Record(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CardError {
    pub fn missing_asset(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::MissingAsset {
            path: path.into(),
            source,
        }
    }

    pub fn style_lookup(suit: impl Into<String>) -> Self {
        Self::StyleLookup { suit: suit.into() }
    }

    pub fn font(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Font {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn record(msg: impl Into<String>) -> Self {
        Self::Record(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            CardError::style_lookup("Pirate")
                .to_string()
                .contains("no style registered for suit 'Pirate'")
        );
        assert!(
            CardError::font("fonts/a.ttf", "bad table")
                .to_string()
                .starts_with("font error fonts/a.ttf")
        );
        assert!(CardError::record("x").to_string().contains("record error:"));
        assert!(CardError::config("x").to_string().contains("config error:"));
    }

    #[test]
    fn missing_asset_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CardError::missing_asset("assets/scroll.png", image::ImageError::IoError(io));
        let text = err.to_string();
        assert!(text.contains("assets/scroll.png"));
        assert!(text.contains("gone"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
