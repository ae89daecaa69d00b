//! Candidate ranking
//!
//! Orders each category's scored candidates into the lists the assembler
//! consumes. Ordering is total and stable for a fixed wardrobe: score
//! descending, then lower wear count, then item id. The rule-based tier
//! bypasses scoring and uses the deterministic default ordering alone.

use std::cmp::Ordering;

use crate::normalize::NormalizedItem;
use crate::pipeline::filter::CandidatePools;
use crate::pipeline::score::{ScoredItem, ScoredPools};

/// Sort every pool by score, breaking ties by wear count then item id
///
/// Scores are finite by the time ranking runs (the scorer rejects
/// non-finite values), so `partial_cmp` cannot fail; equal scores fall
/// through to the deterministic tie-breakers.
pub fn rank_pools(pools: &mut ScoredPools, items: &[NormalizedItem]) {
    for pool in pools.by_category.values_mut() {
        pool.sort_by(|a, b| compare(a, b, items));
    }
}

fn compare(a: &ScoredItem, b: &ScoredItem, items: &[NormalizedItem]) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            items[a.index]
                .item
                .wear_count
                .cmp(&items[b.index].item.wear_count)
        })
        .then_with(|| items[a.index].item.id.cmp(&items[b.index].item.id))
}

/// Deterministic default ordering for the rule-based tier
///
/// Every candidate scores zero; pools are ordered by wear count
/// ascending, then item id, so repeated runs always agree.
pub fn rule_based_pools(items: &[NormalizedItem], pools: &CandidatePools) -> ScoredPools {
    let mut scored = ScoredPools::default();
    for (category, indices) in &pools.by_category {
        let mut pool: Vec<ScoredItem> = indices
            .iter()
            .map(|&index| ScoredItem {
                index,
                score: 0.0,
                style_score: 0.0,
                reasons: vec!["selected by category and weather rules".to_string()],
            })
            .collect();
        pool.sort_by(|a, b| {
            items[a.index]
                .item
                .wear_count
                .cmp(&items[b.index].item.wear_count)
                .then_with(|| items[a.index].item.id.cmp(&items[b.index].item.id))
        });
        scored.by_category.insert(*category, pool);
    }
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_item;
    use ensemble_common::{Category, WardrobeItem};
    use std::collections::BTreeMap;

    fn item_with_wear(name: &str, wear: u32) -> NormalizedItem {
        let mut item = WardrobeItem::new(name, Category::Top);
        item.wear_count = wear;
        normalize_item(&item).0
    }

    fn scored(index: usize, score: f64) -> ScoredItem {
        ScoredItem {
            index,
            score,
            style_score: 0.0,
            reasons: vec![],
        }
    }

    #[test]
    fn test_rank_by_score_descending() {
        let items = vec![
            item_with_wear("A", 0),
            item_with_wear("B", 0),
            item_with_wear("C", 0),
        ];
        let mut pools = ScoredPools {
            by_category: BTreeMap::from([(
                Category::Top,
                vec![scored(0, 0.2), scored(1, 0.9), scored(2, 0.5)],
            )]),
        };
        rank_pools(&mut pools, &items);
        let order: Vec<usize> = pools.candidates(Category::Top).iter().map(|c| c.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_ties_break_by_lower_wear_count() {
        let items = vec![item_with_wear("A", 10), item_with_wear("B", 2)];
        let mut pools = ScoredPools {
            by_category: BTreeMap::from([(
                Category::Top,
                vec![scored(0, 0.5), scored(1, 0.5)],
            )]),
        };
        rank_pools(&mut pools, &items);
        let order: Vec<usize> = pools.candidates(Category::Top).iter().map(|c| c.index).collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn test_full_ties_break_by_item_id() {
        let items = vec![item_with_wear("A", 3), item_with_wear("B", 3)];
        let mut pools = ScoredPools {
            by_category: BTreeMap::from([(
                Category::Top,
                vec![scored(0, 0.5), scored(1, 0.5)],
            )]),
        };
        rank_pools(&mut pools, &items);
        let order: Vec<usize> = pools.candidates(Category::Top).iter().map(|c| c.index).collect();
        let expected = if items[0].item.id < items[1].item.id {
            vec![0, 1]
        } else {
            vec![1, 0]
        };
        assert_eq!(order, expected);
    }

    #[test]
    fn test_rule_based_order_is_wear_then_id() {
        let items = vec![
            item_with_wear("A", 5),
            item_with_wear("B", 1),
            item_with_wear("C", 3),
        ];
        let mut pools = CandidatePools::default();
        pools.by_category.insert(Category::Top, vec![0, 1, 2]);
        let scored = rule_based_pools(&items, &pools);
        let order: Vec<usize> = scored.candidates(Category::Top).iter().map(|c| c.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert!(scored.candidates(Category::Top).iter().all(|c| c.score == 0.0));
    }
}
