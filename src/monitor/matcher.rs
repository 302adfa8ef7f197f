//! Deciding whether a process name belongs to the game.

/// Executable names the game is known to run as, lowercase.
pub const KNOWN_EXECUTABLES: &[&str] = &[
    // The shipped Unreal binary
    "war-win64-shipping.exe",
    "foxhole.exe",
    "foxhole",
];

/// Substring that marks any process as game-like.
pub const GENERIC_FALLBACK: &str = "foxhole";

#[derive(Debug, Clone)]
pub struct ProcessMatcher {
    known: Vec<String>,
    fallback: String,
}

impl Default for ProcessMatcher {
    fn default() -> Self {
        Self::new(KNOWN_EXECUTABLES.iter().copied(), GENERIC_FALLBACK)
    }
}

impl ProcessMatcher {
    pub fn new<'a>(known: impl IntoIterator<Item = &'a str>, fallback: &str) -> Self {
        Self {
            known: known.into_iter().map(str::to_lowercase).collect(),
            fallback: fallback.to_lowercase(),
        }
    }

    /// True when `name`, lowercased, equals or contains a known executable
    /// name or contains the generic fallback.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        let known = self
            .known
            .iter()
            .any(|candidate| name == *candidate || name.contains(candidate.as_str()));

        known || (!self.fallback.is_empty() && name.contains(&self.fallback))
    }

    pub fn any_match<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().any(|name| self.matches(name.as_ref()))
    }

    /// Names containing the fallback substring, for diagnostics.
    pub fn game_like<'n, S: AsRef<str>>(&self, names: &'n [S]) -> Vec<&'n str> {
        names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| name.to_lowercase().contains(&self.fallback))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_shipping_binary_case_insensitive() {
        let matcher = ProcessMatcher::default();
        assert!(matcher.matches("War-Win64-Shipping.exe"));
        assert!(matcher.matches("FOXHOLE.EXE"));
    }

    #[test]
    fn test_matches_renamed_binaries() {
        let matcher = ProcessMatcher::default();
        assert!(matcher.matches("Foxhole-Launcher.exe"));
        assert!(matcher.matches("my-war-win64-shipping.exe.bak"));
    }

    #[test]
    fn test_rejects_unrelated() {
        let matcher = ProcessMatcher::default();
        assert!(!matcher.matches("explorer.exe"));
        assert!(!matcher.matches("war.exe"));
        assert!(!matcher.matches(""));
    }

    #[test]
    fn test_any_match_and_game_like() {
        let matcher = ProcessMatcher::default();
        let names = vec!["svchost.exe", "FoxholeHelper.exe", "steam.exe"];
        assert!(matcher.any_match(&names));
        assert_eq!(matcher.game_like(&names), vec!["FoxholeHelper.exe"]);
        assert!(!matcher.any_match(&["steam.exe"]));
    }

    #[test]
    fn test_custom_matcher() {
        let matcher = ProcessMatcher::new(["Game.EXE"], "");
        assert!(matcher.matches("game.exe"));
        assert!(!matcher.matches("foxhole.exe"));
    }
}
