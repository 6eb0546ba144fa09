//! Shared inputs for the fairdice benchmarks.

use fd_core::{DiceSet, Die};

/// `count` dice with `faces` faces each, drawn by a fixed xorshift64.
pub fn gen_dice_set(count: usize, faces: usize) -> DiceSet {
    let mut x: u64 = 0x1234_5678_9ABC_DEF0;
    let mut dice = Vec::with_capacity(count);
    for _ in 0..count {
        let mut f = Vec::with_capacity(faces);
        for _ in 0..faces {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            f.push((x % 20) as i64);
        }
        dice.push(Die::from_faces(f).expect("bench dice need at least 4 faces"));
    }
    DiceSet::new(dice).expect("bench dice share one face count")
}

pub fn classic_set() -> DiceSet {
    gen_from(&["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"])
}

fn gen_from(tokens: &[&str]) -> DiceSet {
    DiceSet::parse(tokens).expect("valid bench dice")
}
