/// Row classification: derive the candidate filename prefixes for a catalog
/// cell from its category and title.
///
/// Curators annotate titles with variant markers ("(Anim)", "(Live)",
/// "(2D Anim)", "(3D Anim)") that narrow which of the category's prefix
/// tokens are eligible. The markers are stripped before the title is used in
/// prefix construction and display.
///
/// # Examples
///
/// ```
/// use shelfmatch::classifier::RowClassifier;
/// use shelfmatch::config::MatchConfig;
///
/// let config = MatchConfig::default().compile().unwrap();
/// let classifier = RowClassifier::new(&config);
/// let plan = classifier.classify("Board Books", "Three Little Kittens").unwrap();
/// assert_eq!(plan.title, "Three Little Kittens");
/// assert_eq!(plan.prefixes, vec!["Board Book.Three Little Kittens.".to_string()]);
/// ```
use crate::config::{CompiledConfig, ConfigError};

/// The resolution plan for a single catalog cell: the normalized display
/// title plus the ordered candidate prefixes to test against the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPlan {
    /// The title with all variant markers stripped and whitespace trimmed.
    pub title: String,
    /// Candidate prefixes in token-list order. Each ends with the `.`
    /// separator; the trailing separator anchors the match so that "Cat"
    /// never matches "Caterpillar".
    pub prefixes: Vec<String>,
}

impl RowPlan {
    /// A title that normalized to the empty string still proceeds to
    /// resolution, but callers should surface it for operator review.
    pub fn is_suspicious(&self) -> bool {
        self.title.is_empty()
    }
}

/// Derives candidate prefixes for catalog cells.
///
/// Pure given (category, title); holds only a reference to the compiled
/// configuration, so classification never depends on the resolution order
/// of other rows.
pub struct RowClassifier<'a> {
    config: &'a CompiledConfig,
}

impl<'a> RowClassifier<'a> {
    pub fn new(config: &'a CompiledConfig) -> Self {
        Self { config }
    }

    /// Classify one cell into a [`RowPlan`].
    ///
    /// Token selection:
    /// 1. Start from the category's configured token list.
    /// 2. A 2D or 3D marker in the raw title replaces the whole list with
    ///    the single matching dimensional token (category-independent).
    /// 3. A title marked animated skips live-line tokens, and a title
    ///    marked live skips animated-line tokens.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownCategory` if the category has no
    /// configured token list.
    pub fn classify(&self, category: &str, raw_title: &str) -> Result<RowPlan, ConfigError> {
        let variants = self.config.variants();
        let base = self.config.prefix_tokens(category)?;

        let tokens: Vec<&str> = if raw_title.contains(&variants.two_d_marker) {
            vec![variants.two_d_token.as_str()]
        } else if raw_title.contains(&variants.three_d_marker) {
            vec![variants.three_d_token.as_str()]
        } else {
            base.iter().map(String::as_str).collect()
        };

        let animated = raw_title.contains(&variants.animated_marker);
        let live = raw_title.contains(&variants.live_marker);

        let title = self.normalize(raw_title);

        let mut prefixes = Vec::with_capacity(tokens.len());
        for token in tokens {
            if animated && token.contains(&variants.live_tag) {
                continue;
            }
            if live && token.contains(&variants.animated_tag) {
                continue;
            }
            prefixes.push(format!("{}.{}.", token, title));
        }

        Ok(RowPlan { title, prefixes })
    }

    /// Strip all known variant markers from a title and trim whitespace.
    ///
    /// Idempotent: normalizing an already-normalized title returns it
    /// unchanged.
    pub fn normalize(&self, raw_title: &str) -> String {
        let mut title = raw_title.to_string();
        for marker in self.config.variants().markers() {
            title = title.replace(marker, "");
        }
        title.trim().to_string()
    }
}
