use crate::cards::Card;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

/// Best five-card strength. Ordering compares category, then kickers.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct HandStrength {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

impl HandStrength {
    fn new(category: Category, ranks: &[u8]) -> Self {
        let mut kickers = [0u8; 5];
        for (slot, &r) in kickers.iter_mut().zip(ranks) {
            *slot = r;
        }
        Self { category, kickers }
    }
}

/// Evaluates the best five-card hand among `cards` (typically hole + board,
/// five to seven cards).
pub fn evaluate_hand(cards: &[Card]) -> HandStrength {
    let mut counts = [0u8; 15];
    let mut suit_masks = [0u16; 4];
    let mut rank_mask = 0u16;
    for c in cards {
        let r = c.rank.value();
        counts[r as usize] += 1;
        suit_masks[c.suit.index()] |= 1 << r;
        rank_mask |= 1 << r;
    }

    let flush_mask = suit_masks.iter().copied().find(|m| m.count_ones() >= 5);
    if let Some(high) = flush_mask.and_then(straight_high) {
        return HandStrength::new(Category::StraightFlush, &[high]);
    }

    // (count, rank), largest groups first, then higher ranks
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .filter(|&r| counts[r as usize] > 0)
        .map(|r| (counts[r as usize], r))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));
    let (top_count, top_rank) = groups.first().copied().unwrap_or((0, 0));
    let (second_count, second_rank) = groups.get(1).copied().unwrap_or((0, 0));

    if top_count == 4 {
        let mut ranks = vec![top_rank];
        ranks.extend(highest(rank_mask, &[top_rank], 1));
        return HandStrength::new(Category::FourOfAKind, &ranks);
    }
    if top_count == 3 && second_count >= 2 {
        return HandStrength::new(Category::FullHouse, &[top_rank, second_rank]);
    }
    if let Some(mask) = flush_mask {
        return HandStrength::new(Category::Flush, &highest(mask, &[], 5));
    }
    if let Some(high) = straight_high(rank_mask) {
        return HandStrength::new(Category::Straight, &[high]);
    }
    if top_count == 3 {
        let mut ranks = vec![top_rank];
        ranks.extend(highest(rank_mask, &[top_rank], 2));
        return HandStrength::new(Category::ThreeOfAKind, &ranks);
    }
    if top_count == 2 && second_count == 2 {
        let mut ranks = vec![top_rank, second_rank];
        ranks.extend(highest(rank_mask, &[top_rank, second_rank], 1));
        return HandStrength::new(Category::TwoPair, &ranks);
    }
    if top_count == 2 {
        let mut ranks = vec![top_rank];
        ranks.extend(highest(rank_mask, &[top_rank], 3));
        return HandStrength::new(Category::OnePair, &ranks);
    }
    HandStrength::new(Category::HighCard, &highest(rank_mask, &[], 5))
}

/// Up to `n` ranks present in `mask`, high to low, skipping `exclude`.
fn highest(mask: u16, exclude: &[u8], n: usize) -> Vec<u8> {
    (2..=14u8)
        .rev()
        .filter(|r| mask & (1u16 << *r) != 0 && !exclude.contains(r))
        .take(n)
        .collect()
}

/// Top rank of the best straight in `mask`; the wheel (A-2-3-4-5) is 5-high.
fn straight_high(mask: u16) -> Option<u8> {
    let mut m = mask;
    if m & (1 << 14) != 0 {
        m |= 1 << 1;
    }
    (5..=14u8).rev().find(|&high| {
        let window = 0b1_1111u16 << (high - 4);
        m & window == window
    })
}
