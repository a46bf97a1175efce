//! Model value object representing an LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// LLM models known to the solver (Value Object)
///
/// Any other model name is carried through as [`Model::Custom`], so new
/// provider releases work without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Gemini20Flash001,
    Gemini20Flash,
    Gemini25Flash,
    Gemini25Pro,
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini20Flash001 => "gemini-2.0-flash-001",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Custom(s) => s,
        }
    }
}

impl Default for Model {
    /// Returns the default model (gemini-2.0-flash-001)
    fn default() -> Self {
        Model::Gemini20Flash001
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // The REST API lists models as "models/<name>"
        let s = s.strip_prefix("models/").unwrap_or(s);
        Ok(match s {
            "gemini-2.0-flash-001" => Model::Gemini20Flash001,
            "gemini-2.0-flash" => Model::Gemini20Flash,
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}
