use regex::Regex;

/// A single entry in the excluded-path list: either a literal path or a
/// regular expression matched against the full route path.
#[derive(Debug, Clone)]
pub enum PathMatcher {
    Literal(String),
    Pattern(Regex),
}

impl PathMatcher {
    /// Compile a pattern entry. Invalid patterns surface the regex error to
    /// the caller rather than being silently dropped.
    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        Ok(Self::Pattern(Regex::new(source)?))
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Literal(literal) => literal == path,
            PathMatcher::Pattern(regex) => regex.is_match(path),
        }
    }
}

// Pattern entries compare structurally — same source text (inline flags
// included) — so removal works on independently constructed matchers.
impl PartialEq for PathMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PathMatcher::Literal(a), PathMatcher::Literal(b)) => a == b,
            (PathMatcher::Pattern(a), PathMatcher::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for PathMatcher {}

impl From<&str> for PathMatcher {
    fn from(path: &str) -> Self {
        PathMatcher::Literal(path.to_string())
    }
}

impl From<String> for PathMatcher {
    fn from(path: String) -> Self {
        PathMatcher::Literal(path)
    }
}

impl From<Regex> for PathMatcher {
    fn from(regex: Regex) -> Self {
        PathMatcher::Pattern(regex)
    }
}

/// The exclusion policy: which routes are omitted from the generated
/// document. Each dimension is independent; `None` means "no filtering on
/// that dimension". A route is excluded when ANY dimension matches it.
///
/// The policy value is fully owned — it is cloned on the way into the store
/// and on the way out, so callers can never alias internal state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exclusion {
    pub paths: Option<Vec<PathMatcher>>,
    pub tags: Option<Vec<String>>,
    pub methods: Option<Vec<String>>,
}

impl Exclusion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathMatcher>,
    {
        self.paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = Some(
            methods
                .into_iter()
                .map(|m| m.into().to_ascii_uppercase())
                .collect(),
        );
        self
    }

    /// Whether the given tag name is in the excluded-tag set.
    pub fn excludes_tag(&self, tag: &str) -> bool {
        self.tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }

    // ── Mutation helpers ────────────────────────────────────────────────
    //
    // Each returns whether the policy actually changed, so the store can
    // skip cache invalidation on no-op mutations.

    pub(crate) fn add_paths(&mut self, values: Vec<PathMatcher>) -> bool {
        if values.is_empty() {
            return false;
        }
        self.paths.get_or_insert_with(Vec::new).extend(values);
        true
    }

    pub(crate) fn remove_paths(&mut self, values: &[PathMatcher]) -> bool {
        let Some(paths) = self.paths.as_mut() else {
            return false;
        };
        let before = paths.len();
        paths.retain(|entry| !values.contains(entry));
        paths.len() != before
    }

    pub(crate) fn add_tags(&mut self, values: Vec<String>) -> bool {
        let tags = self.tags.get_or_insert_with(Vec::new);
        let mut changed = false;
        for tag in values {
            if !tags.contains(&tag) {
                tags.push(tag);
                changed = true;
            }
        }
        changed
    }

    pub(crate) fn remove_tags(&mut self, values: &[String]) -> bool {
        let Some(tags) = self.tags.as_mut() else {
            return false;
        };
        let before = tags.len();
        tags.retain(|tag| !values.contains(tag));
        tags.len() != before
    }

    pub(crate) fn add_methods(&mut self, values: Vec<String>) -> bool {
        let methods = self.methods.get_or_insert_with(Vec::new);
        let mut changed = false;
        for method in values {
            let method = method.to_ascii_uppercase();
            if !methods.iter().any(|m| m.eq_ignore_ascii_case(&method)) {
                methods.push(method);
                changed = true;
            }
        }
        changed
    }

    pub(crate) fn remove_methods(&mut self, values: &[String]) -> bool {
        let Some(methods) = self.methods.as_mut() else {
            return false;
        };
        let before = methods.len();
        methods.retain(|method| !values.iter().any(|v| v.eq_ignore_ascii_case(method)));
        methods.len() != before
    }
}
