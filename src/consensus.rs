//! The agreement rule applied to the settled answers of one logical query.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, error, warn};

use crate::error::{MultiExplorerError, Result};
use crate::types::BlockQuery;

/// One provider's settled attempt at one query.
#[derive(Debug)]
pub(crate) struct Outcome<T> {
    pub url: String,
    pub result: Result<T>,
}

/// Accepts a value only if every successful provider returned it.
///
/// Failed outcomes are dropped. Successes are grouped by value equality:
/// no group means [`MultiExplorerError::NoConsensus`], one group is the
/// answer, and more than one is a [`MultiExplorerError::Conflict`]. The
/// result depends only on the multiset of outcomes, never on their order.
pub(crate) fn reach_consensus<T>(query: &BlockQuery, outcomes: Vec<Outcome<T>>) -> Result<T>
where
    T: Eq + Hash + Debug,
{
    let total = outcomes.len();
    let mut groups: HashMap<T, Vec<String>> = HashMap::new();

    for Outcome { url, result } in outcomes {
        match result {
            Ok(value) => {
                debug!("Provider {} answered {}: {:?}", url, query, value);
                groups.entry(value).or_default().push(url);
            }
            Err(e) if e.is_timeout() => warn!("Provider {} timed out on {}", url, query),
            Err(e) if e.is_provider_failure() => {
                warn!("Provider {} failed on {}: {}", url, query, e)
            }
            Err(e) => error!("Provider {} returned an unexpected error on {}: {}", url, query, e),
        }
    }

    let distinct = groups.len();
    let mut groups = groups.into_iter();

    match (groups.next(), groups.next()) {
        (None, _) => {
            error!("No consensus on {}: all {} providers failed", query, total);
            Err(MultiExplorerError::NoConsensus {
                query: query.clone(),
            })
        }
        (Some((value, urls)), None) => {
            debug!(
                "Consensus on {} from {} of {} providers",
                query,
                urls.len(),
                total
            );
            Ok(value)
        }
        (Some(first), Some(second)) => {
            error!(
                "Providers disagree on {}: {} distinct answers, e.g. {:?} vs {:?}",
                query, distinct, first, second
            );
            Err(MultiExplorerError::Conflict {
                query: query.clone(),
                distinct,
            })
        }
    }
}
