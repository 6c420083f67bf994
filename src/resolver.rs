/// Filename resolution: bind an ordered candidate-prefix list to the best
/// matching file in the resource pool.
///
/// Filenames on disk rarely match the catalog exactly. Resolution therefore
/// layers three rules on top of a literal case-insensitive prefix test:
/// a fixed table of punctuation substitutions bridging curator typos, a
/// shortest-filename tie-break when several files share a prefix, and an
/// ignored-extension list for stray container formats.
///
/// # Examples
///
/// ```
/// use shelfmatch::config::MatchConfig;
/// use shelfmatch::resolver::FileResolver;
///
/// let config = MatchConfig::default().compile().unwrap();
/// let resolver = FileResolver::new(&config);
/// let pool = vec![
///     "Board Book.Three Little Kittens.pdf".to_string(),
///     "Board Book.Three Little Kittens.Extra.pdf".to_string(),
/// ];
/// let found = resolver.resolve(&["Board Book.Three Little Kittens.".to_string()], &pool);
/// assert_eq!(found.as_deref(), Some("Board Book.Three Little Kittens.pdf"));
/// ```
use crate::config::CompiledConfig;

/// Resolves candidate prefixes against a read-only pool snapshot.
pub struct FileResolver<'a> {
    config: &'a CompiledConfig,
}

impl<'a> FileResolver<'a> {
    pub fn new(config: &'a CompiledConfig) -> Self {
        Self { config }
    }

    /// Find the best-matching pool filename for an ordered candidate-prefix
    /// list, or `None` if no candidate matches anything.
    ///
    /// The best match accumulates across all candidates as a left-to-right
    /// reduction; a later candidate can still improve on an earlier one.
    /// `None` is a non-fatal per-row outcome.
    pub fn resolve(&self, prefixes: &[String], pool: &[String]) -> Option<String> {
        prefixes
            .iter()
            .fold(None, |best, prefix| self.resolve_prefix(prefix, pool, best))
    }

    /// One reduction step: test a single candidate prefix against the pool,
    /// improving on `best` where possible.
    ///
    /// Direct case-insensitive prefix matches are collected and
    /// disambiguated by character count, skipping ignored extensions: the
    /// shortest matching filename is assumed to be the most exact, since
    /// longer ones carry suffixes belonging to a different row. Filenames
    /// that fail the direct test are retried against each
    /// substitution-rewritten prefix; such a fallback hit replaces the
    /// accumulator outright, and only the most recent one is retained.
    fn resolve_prefix(
        &self,
        prefix: &str,
        pool: &[String],
        best: Option<String>,
    ) -> Option<String> {
        let mut best = best;
        let mut direct_matches: Vec<&String> = Vec::new();

        for filename in pool {
            if starts_with_ignore_case(filename, prefix) {
                direct_matches.push(filename);
                continue;
            }
            for (pattern, replacement) in self.config.substitutions() {
                let rewritten = prefix.replace(pattern.as_str(), replacement);
                if starts_with_ignore_case(filename, &rewritten) {
                    best = Some(filename.clone());
                }
            }
        }

        for filename in direct_matches {
            if self.config.is_ignored_extension(filename) {
                continue;
            }
            let improves = match &best {
                None => true,
                Some(current) => char_count(filename) < char_count(current),
            };
            if improves {
                best = Some(filename.clone());
            }
        }

        best
    }
}

fn starts_with_ignore_case(filename: &str, prefix: &str) -> bool {
    filename.to_lowercase().starts_with(&prefix.to_lowercase())
}

fn char_count(s: &str) -> usize {
    s.chars().count()
}
