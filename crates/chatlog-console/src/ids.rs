use regex::Regex;
use std::sync::LazyLock;

static RE_PREFIXED_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^id:(\d+)$").unwrap());
static RE_NUMERIC_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

/// A channel or user as it goes into the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Name(String),
    Id(String),
}

impl Subject {
    pub fn value(&self) -> &str {
        match self {
            Subject::Name(v) | Subject::Id(v) => v,
        }
    }

    pub fn is_id(&self) -> bool {
        matches!(self, Subject::Id(_))
    }

    /// Suffix of the route keyword: `channel` vs `channelid`, `user` vs `userid`.
    pub fn route_suffix(&self) -> &'static str {
        if self.is_id() {
            "id"
        } else {
            ""
        }
    }
}

/// Maps a human-readable channel or user string to the form used in requests.
pub trait IdResolver: Send + Sync {
    fn resolve(&self, raw: &str) -> Subject;
}

/// Resolves `id:<digits>` values to ids, leaving everything else a name.
///
/// Bare digits are only taken as ids with [`PrefixIdResolver::numeric_ids`],
/// since plain logins may consist of digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixIdResolver {
    numeric_ids: bool,
}

impl PrefixIdResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn numeric_ids(mut self, enabled: bool) -> Self {
        self.numeric_ids = enabled;
        self
    }
}

impl IdResolver for PrefixIdResolver {
    fn resolve(&self, raw: &str) -> Subject {
        if self.numeric_ids && RE_NUMERIC_ID.is_match(raw) {
            return Subject::Id(raw.to_string());
        }
        if let Some(caps) = RE_PREFIXED_ID.captures(raw) {
            return Subject::Id(caps[1].to_string());
        }
        Subject::Name(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_id_is_stripped() {
        let resolver = PrefixIdResolver::new();
        assert_eq!(resolver.resolve("id:22484632"), Subject::Id("22484632".to_string()));
        assert_eq!(resolver.resolve("forsen"), Subject::Name("forsen".to_string()));
    }

    #[test]
    fn test_malformed_prefix_stays_a_name() {
        let resolver = PrefixIdResolver::new();
        assert_eq!(resolver.resolve("id:abc"), Subject::Name("id:abc".to_string()));
        assert_eq!(resolver.resolve("id:"), Subject::Name("id:".to_string()));
    }

    #[test]
    fn test_bare_digits_need_opt_in() {
        assert_eq!(
            PrefixIdResolver::new().resolve("12345"),
            Subject::Name("12345".to_string())
        );
        assert_eq!(
            PrefixIdResolver::new().numeric_ids(true).resolve("12345"),
            Subject::Id("12345".to_string())
        );
    }

    #[test]
    fn test_route_suffix() {
        assert_eq!(Subject::Id("1".to_string()).route_suffix(), "id");
        assert_eq!(Subject::Name("a".to_string()).route_suffix(), "");
    }
}
