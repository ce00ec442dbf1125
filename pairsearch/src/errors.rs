/// Errors produced while building particle sets, exclusion tables or while
/// searching for neighbor pairs.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// The search, a particle set or a unit cell was configured with an
    /// invalid value (missing cutoff, missing callback, duplicated particle
    /// ids, ...). These errors are reported before any pair is considered.
    Configuration(String),
    /// Some data was read before being set, typically the position of a
    /// particle
    Precompletion(String),
    /// Error while serializing/deserializing parameters
    Json(serde_json::Error),
    /// Error raised by a user-provided callback (match function or pair
    /// factory), forwarded unchanged
    External(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wrap an error coming from a user callback
    pub fn external(error: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Error {
        Error::External(error.into())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Configuration(e) => write!(f, "invalid configuration: {}", e),
            Error::Precompletion(e) => write!(f, "missing data: {}", e),
            Error::Json(e) => write!(f, "json error: {}", e),
            Error::External(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Configuration(_) |
            Error::Precompletion(_) => None,
            Error::Json(e) => Some(e),
            Error::External(e) => Some(&**e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::Json(error)
    }
}

impl From<glob::PatternError> for Error {
    fn from(error: glob::PatternError) -> Error {
        Error::Configuration(format!("invalid selection pattern: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let error = Error::Configuration("the cutoff must be positive".into());
        assert_eq!(error.to_string(), "invalid configuration: the cutoff must be positive");

        let error = Error::Precompletion("position of particle 3 is not set".into());
        assert_eq!(error.to_string(), "missing data: position of particle 3 is not set");

        let error = Error::external("histogram overflow");
        assert_eq!(error.to_string(), "histogram overflow");
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn conversions() {
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = Error::from(json);
        assert!(matches!(error, Error::Json(_)));

        let pattern = glob::Pattern::new("[C").unwrap_err();
        let error = Error::from(pattern);
        assert!(matches!(error, Error::Configuration(_)));
    }
}
