/// Lifecycle transitions reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    Active,
    Inactive,
    Background,
}

impl ScenePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenePhase::Active => "active",
            ScenePhase::Inactive => "inactive",
            ScenePhase::Background => "background",
        }
    }
}

impl std::str::FromStr for ScenePhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" | "a" => Ok(ScenePhase::Active),
            "inactive" | "i" => Ok(ScenePhase::Inactive),
            "background" | "b" => Ok(ScenePhase::Background),
            _ => Err(format!("Unknown scene phase: {}", s)),
        }
    }
}

impl std::fmt::Display for ScenePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
