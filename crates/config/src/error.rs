use thiserror::Error;

/// A value was rejected by a property's validity check
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    #[error("value {value} is out of range [{min}, {max}]")]
    OutOfRange { value: String, min: String, max: String },
    #[error("unknown enumeration value {0}")]
    UnknownEnumValue(i64),
    #[error("unknown enumeration name '{0}'")]
    UnknownEnumName(String),
    #[error("{0}")]
    Invalid(String),
}

/// A variant could not be mapped onto a property
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("cannot convert {found} variant to {kind} property")]
    IncompatibleVariant { kind: &'static str, found: &'static str },
    #[error("invalid value: {0}")]
    Invalid(#[from] PropertyError),
    #[error("no conversion registered for {0} properties")]
    UnsupportedKind(&'static str),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

/// Failure attached to a single property during a batch operation
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFailure {
    pub key: String,
    pub error: ConversionError,
}

impl std::fmt::Display for PropertyFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.error)
    }
}
