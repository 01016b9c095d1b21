use crate::types::{Article, RawArticle};
use std::collections::{HashMap, HashSet};

/// Fairly interleave per-symbol article queues into one capped digest.
///
/// Symbols are visited in their given order, one article per symbol per
/// round, so a symbol with a deep queue cannot crowd the others out. Each
/// pick is tagged with its symbol and the round it was discovered in. The
/// collected picks are then ordered most-recent-first; the stable sort keeps
/// round-major pick order on timestamp ties.
///
/// An empty result means every queue was empty and the caller should fall
/// back to the general feed.
pub fn round_robin_merge(
    symbol_order: &[String],
    queues: &HashMap<String, Vec<RawArticle>>,
    max_articles: usize,
) -> Vec<Article> {
    let mut cursors = vec![0usize; symbol_order.len()];
    let mut collected: Vec<Article> = Vec::with_capacity(max_articles);

    'rounds: for round in 0..max_articles {
        let mut took_any = false;
        for (i, symbol) in symbol_order.iter().enumerate() {
            let queue = queues.get(symbol).map(Vec::as_slice).unwrap_or(&[]);
            let raw = match queue.get(cursors[i]) {
                Some(raw) => raw,
                None => continue,
            };
            cursors[i] += 1;
            took_any = true;
            collected.push(Article::from_raw(raw, true, Some(symbol), round));
            if collected.len() >= max_articles {
                break 'rounds;
            }
        }
        if !took_any {
            break;
        }
    }

    collected.sort_by(|a, b| b.datetime.cmp(&a.datetime));
    collected
}

/// Deduplicate the general feed and cap it.
///
/// First occurrence of an identity key wins. Scanning stops once `scan_cap`
/// unique candidates are collected, independent of the final cap. Provider
/// order is preserved on this path; the index doubles as the pick order.
pub fn dedupe_general(
    raw_articles: &[RawArticle],
    scan_cap: usize,
    max_articles: usize,
) -> Vec<Article> {
    let mut seen = HashSet::new();
    let mut unique: Vec<&RawArticle> = Vec::new();

    for raw in raw_articles.iter().filter(|a| a.is_valid()) {
        if !seen.insert(raw.dedup_key()) {
            continue;
        }
        unique.push(raw);
        if unique.len() >= scan_cap {
            break;
        }
    }

    unique
        .into_iter()
        .take(max_articles)
        .enumerate()
        .map(|(index, raw)| Article::from_raw(raw, false, None, index))
        .collect()
}
