#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Unknown,
    Active,
    Inactive,
    Background,
}

impl AppState {
    /// Parses a transition state. `unknown` is the pre-observation
    /// value, not a transition; parsing rejects it.
    pub fn from_str_ignore_case(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "background" => Some(Self::Background),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Background => "background",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignore_case() {
        assert_eq!(
            AppState::from_str_ignore_case("active"),
            Some(AppState::Active)
        );
        assert_eq!(
            AppState::from_str_ignore_case("BACKGROUND"),
            Some(AppState::Background)
        );
        assert_eq!(
            AppState::from_str_ignore_case("Inactive"),
            Some(AppState::Inactive)
        );
    }

    #[test]
    fn test_unknown_is_not_a_transition() {
        assert_eq!(AppState::from_str_ignore_case("unknown"), None);
        assert_eq!(AppState::from_str_ignore_case("foreground"), None);
        assert_eq!(AppState::from_str_ignore_case(""), None);
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(AppState::Unknown.to_string(), "unknown");
        assert_eq!(AppState::Active.to_string(), "active");
        assert_eq!(AppState::Inactive.as_str(), "inactive");
        assert_eq!(AppState::Background.as_str(), "background");
    }
}
