//! Win-probability engine.
//!
//! Probabilities are exact: every face of one die is compared with every face of
//! the other, so the result only depends on the multiset of faces, never on their
//! order. Ties count as a win for neither side but stay in the denominator.

use crate::dice::{DiceSet, Die};

/// Outcome counts of one die against another over the full cross product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Odds {
    pub wins: u64,
    pub ties: u64,
    pub total: u64,
}

impl Odds {
    pub fn losses(&self) -> u64 {
        self.total - self.wins - self.ties
    }

    pub fn win(&self) -> f64 {
        ratio(self.wins, self.total)
    }

    pub fn tie(&self) -> f64 {
        ratio(self.ties, self.total)
    }

    pub fn loss(&self) -> f64 {
        ratio(self.losses(), self.total)
    }

    /// Win probability as a reduced fraction `(numerator, denominator)`.
    pub fn win_fraction(&self) -> (u64, u64) {
        if self.total == 0 {
            return (0, 1);
        }
        let g = gcd(self.wins, self.total);
        (self.wins / g, self.total / g)
    }

    /// The same matchup seen from the other die.
    pub fn swapped(&self) -> Self {
        Self {
            wins: self.losses(),
            ties: self.ties,
            total: self.total,
        }
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

/// Compare every face of `a` with every face of `b`.
pub fn compare(a: &Die, b: &Die) -> Odds {
    let mut wins = 0u64;
    let mut ties = 0u64;
    for &fa in a.faces() {
        for &fb in b.faces() {
            if fa > fb {
                wins += 1;
            } else if fa == fb {
                ties += 1;
            }
        }
    }
    Odds {
        wins,
        ties,
        total: (a.face_count() * b.face_count()) as u64,
    }
}

/// Probability that `a` shows a strictly higher face than `b`.
pub fn win_probability(a: &Die, b: &Die) -> f64 {
    compare(a, b).win()
}

pub fn tie_probability(a: &Die, b: &Die) -> f64 {
    compare(a, b).tie()
}

/// Lazy iterator over `(index, die, odds)` of the chosen die against every other
/// die of a set, in configuration order.
pub struct Matchups<'a> {
    set: &'a DiceSet,
    chosen: &'a Die,
    chosen_index: usize,
    next: usize,
}

impl<'a> Iterator for Matchups<'a> {
    type Item = (usize, &'a Die, Odds);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.set.len() {
            let index = self.next;
            self.next += 1;
            if index == self.chosen_index {
                continue;
            }
            let other = self.set.get(index)?;
            return Some((index, other, compare(self.chosen, other)));
        }
        None
    }
}

/// Odds of `set[chosen]` against every other die. `None` if `chosen` is out of range.
pub fn matchups(set: &DiceSet, chosen: usize) -> Option<Matchups<'_>> {
    let die = set.get(chosen)?;
    Some(Matchups {
        set,
        chosen: die,
        chosen_index: chosen,
        next: 0,
    })
}

/// Candidate with the best chance of beating `set[against]`.
///
/// Ties between candidates go to the one listed first. Returns `None` when no
/// candidate is a valid index.
pub fn best_counter(set: &DiceSet, against: usize, candidates: &[usize]) -> Option<usize> {
    let target = set.get(against)?;
    let mut best: Option<(usize, Odds)> = None;
    for &idx in candidates {
        let Some(die) = set.get(idx) else { continue };
        let odds = compare(die, target);
        let better = match best {
            None => true,
            // Cross-multiply: all dice in a set share a face count, but stay exact anyway.
            Some((_, b)) => {
                (odds.wins as u128) * (b.total as u128) > (b.wins as u128) * (odds.total as u128)
            }
        };
        if better {
            best = Some((idx, odds));
        }
    }
    best.map(|(idx, _)| idx)
}
