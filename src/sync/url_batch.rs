//! Batched query-string rewriting.
//!
//! One navigation per query-parameter change would reload the page once per
//! setting and race the cookie/storage calls that follow. Instead the engine
//! folds every mutation for one call into a single rewrite of the URL and
//! issues at most one navigation.

use url::Url;

/// One pending change to a URL's query string.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryMutation<'a> {
    /// Set or overwrite a parameter.
    Set { key: &'a str, value: &'a str },
    /// Drop a parameter; absent keys are a no-op.
    Delete { key: &'a str },
}

/// Apply every mutation in order to the URL's query string.
///
/// Unrelated parameters are preserved. A `Set` on an existing key replaces
/// the first occurrence in place and drops later duplicates, matching the
/// browser's `URLSearchParams.set`. Returns `None` when the mutations leave
/// the URL unchanged, so the caller can skip the navigation entirely.
pub fn rewrite_query(url: &Url, mutations: &[QueryMutation<'_>]) -> Option<Url> {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut changed = false;

    for mutation in mutations {
        match mutation {
            QueryMutation::Set { key, value } => {
                if let Some(pos) = pairs.iter().position(|(k, _)| k == key) {
                    if pairs[pos].1 != *value {
                        pairs[pos].1 = (*value).to_string();
                        changed = true;
                    }
                    let before = pairs.len();
                    pairs.retain(|(k, _)| k != key);
                    pairs.insert(pos, ((*key).to_string(), (*value).to_string()));
                    if pairs.len() != before {
                        changed = true;
                    }
                } else {
                    pairs.push(((*key).to_string(), (*value).to_string()));
                    changed = true;
                }
            }
            QueryMutation::Delete { key } => {
                let before = pairs.len();
                pairs.retain(|(k, _)| k != key);
                if pairs.len() != before {
                    changed = true;
                }
            }
        }
    }

    if !changed {
        return None;
    }

    let mut rewritten = url.clone();
    if pairs.is_empty() {
        rewritten.set_query(None);
    } else {
        rewritten
            .query_pairs_mut()
            .clear()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Some(rewritten)
}
