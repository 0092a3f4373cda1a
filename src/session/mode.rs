//! Session mode, computed once from the active progress key.

/// Key of the wrong-answer review list.
pub const WRONG_KEY: &str = "wrong";
/// Key of the starred review list.
pub const STAR_KEY: &str = "star";
/// Prefix of randomly sampled session keys.
pub const RANDOM_PREFIX: &str = "random:";
/// Prefix the backend uses for tag sessions, e.g. `tag:wrong`.
pub const TAG_PREFIX: &str = "tag:";

/// Which filtered practice list a tag session reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    Wrong,
    Star,
    /// Random sample; holds the token after `random:`.
    Random(String),
    /// Any other `tag:<name>` list.
    Named(String),
}

impl TagKind {
    /// Classify a progress key. `None` means the key is not a tag session.
    pub fn from_key(key: &str) -> Option<Self> {
        if let Some(token) = key.strip_prefix(RANDOM_PREFIX) {
            return Some(Self::Random(token.to_string()));
        }
        let name = key.strip_prefix(TAG_PREFIX);
        match name.unwrap_or(key) {
            WRONG_KEY => Some(Self::Wrong),
            STAR_KEY => Some(Self::Star),
            other if name.is_some() => Some(Self::Named(other.to_string())),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Wrong => "wrong answers".to_string(),
            Self::Star => "starred".to_string(),
            Self::Random(token) => format!("random {token}"),
            Self::Named(name) => name.clone(),
        }
    }
}

/// How answers, history and disclosure behave for the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// History comes straight from the cache; answered questions stay locked.
    #[default]
    Normal,
    /// Every answer disclosed, nothing answerable.
    Reveal,
    /// One fresh attempt per question per session.
    TagFiltered(TagKind),
}

impl Mode {
    /// Reveal wins over tag classification: a revealed tag list is still study-only.
    pub fn classify(key: Option<&str>, reveal: bool) -> Self {
        if reveal {
            return Self::Reveal;
        }
        match key.and_then(TagKind::from_key) {
            Some(kind) => Self::TagFiltered(kind),
            None => Self::Normal,
        }
    }

    pub fn is_reveal(&self) -> bool {
        matches!(self, Self::Reveal)
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, Self::TagFiltered(_))
    }

    pub fn label(&self) -> String {
        match self {
            Self::Normal => "practice".to_string(),
            Self::Reveal => "study".to_string(),
            Self::TagFiltered(kind) => format!("review: {}", kind.label()),
        }
    }
}
