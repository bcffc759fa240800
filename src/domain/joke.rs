use serde::{Deserialize, Serialize};

/// A single joke as served by the endpoint.
///
/// The wire names (`joke`, `status`) are kept on disk too, so a favourites file
/// holds exactly the objects the endpoint returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub id: String,
    #[serde(rename = "joke")]
    pub text: String,
    /// Status echoed in the payload, not the transport status
    #[serde(rename = "status")]
    pub status_code: i64,
}

impl Joke {
    pub fn new(id: impl Into<String>, text: impl Into<String>, status_code: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            status_code,
        }
    }

    pub fn key(&self) -> JokeKey {
        JokeKey::from_text(&self.text)
    }
}

/// Identity of a favourite. Two jokes with the same text are the same favourite.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JokeKey(String);

impl JokeKey {
    pub fn from_text(text: &str) -> Self {
        Self(text.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JokeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
