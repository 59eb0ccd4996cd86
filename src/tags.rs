//! Tag specifications and matching.
//!
//! Raw tags are normalized (trimmed, lower-cased) and compiled into two
//! sets: exact names and prefix stems. A trailing `*` opts a tag into
//! prefix matching; without it the tag is exact, after synonym
//! expansion. Matching checks exclusions before inclusions.

use std::collections::BTreeSet;

use crate::types::EmptyIncludePolicy;

/// Fixed synonym table, applied to exact entries at build time.
///
/// Each normalized name expands to one or more normalized equivalents:
/// near-duplicate spellings and related specialized names seen in the
/// wild.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("warehouse", &["warehouse", "itemwarehouse"]),
    ("oportunity", &["opportunity"]),
];

/// Trailing marker requesting prefix matching for a tag.
const WILDCARD: char = '*';

/// Compiled exact/prefix sets for one side of a specification.
///
/// `BTreeSet` keeps summary output sorted and stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSets {
    pub exact: BTreeSet<String>,
    pub prefix: BTreeSet<String>,
}

impl TagSets {
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.prefix.is_empty()
    }
}

/// Flatten repeatable, comma-separated tag arguments.
///
/// `["a,b", " c "]` becomes `["a", "b", "c"]`. Empty pieces are dropped.
pub fn split_tag_args(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Build exact and prefix sets from raw tag strings.
///
/// A tag ending in `*` registers its stem as a prefix (an empty stem is
/// dropped); otherwise the tag registers as exact, with known synonyms
/// expanding into additional exact entries. Original casing is not
/// retained; comparison is always on the lower-cased form.
pub fn build_tag_sets(raw: &[String]) -> TagSets {
    let mut sets = TagSets::default();
    for tag in raw {
        let normalized = tag.trim().to_lowercase();
        if normalized.is_empty() {
            continue;
        }
        if let Some(stem) = normalized.strip_suffix(WILDCARD) {
            let stem = stem.trim();
            if !stem.is_empty() {
                sets.prefix.insert(stem.to_string());
            }
            continue;
        }
        match SYNONYMS.iter().find(|(name, _)| *name == normalized) {
            Some((_, expansions)) => {
                for s in *expansions {
                    sets.exact.insert((*s).to_string());
                }
            }
            None => {
                sets.exact.insert(normalized);
            }
        }
    }
    sets
}

/// Compiled include/exclude specification.
///
/// Prefix stems match by raw case-insensitive `starts_with`: `sales*`
/// matches `SalesOrder` and also `Salesperson`. Only the explicit
/// wildcard creates a prefix, so a bare `sales` never matches either.
#[derive(Debug, Clone)]
pub struct TagMatcher {
    include: TagSets,
    exclude: TagSets,
    empty_include: EmptyIncludePolicy,
}

impl TagMatcher {
    pub fn new(include: TagSets, exclude: TagSets, empty_include: EmptyIncludePolicy) -> Self {
        Self {
            include,
            exclude,
            empty_include,
        }
    }

    /// Whether a candidate tag satisfies the specification.
    ///
    /// Exclusion always wins; inclusion is consulted only afterwards.
    /// With no include entries at all, the empty-include policy decides.
    pub fn matches(&self, tag: &str) -> bool {
        let t = tag.trim().to_lowercase();
        if self.exclude.exact.contains(&t) {
            return false;
        }
        if self.exclude.prefix.iter().any(|p| t.starts_with(p.as_str())) {
            return false;
        }
        if self.include.is_empty() {
            return self.empty_include == EmptyIncludePolicy::MatchAll;
        }
        self.include.exact.contains(&t)
            || self.include.prefix.iter().any(|p| t.starts_with(p.as_str()))
    }

    pub fn include(&self) -> &TagSets {
        &self.include
    }

    pub fn exclude(&self) -> &TagSets {
        &self.exclude
    }
}
