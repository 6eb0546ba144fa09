//! Dice model: parsed, validated, immutable face sequences.
//!
//! A die is built once from a command-line token such as `2,2,4,4,9,9` and never
//! mutated afterwards. A `DiceSet` is the whole configuration the game is played
//! with; every die in it has the same number of faces.

use std::fmt;

use thiserror::Error;

/// Minimum number of faces a die may have.
pub const MIN_FACES: usize = 4;

/// Configuration errors raised while building dice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("no dice were provided")]
    Empty,
    #[error("invalid face {face:?} in die `{token}`: every face must be an integer")]
    InvalidFace { token: String, face: String },
    #[error("die `{token}` has {faces} faces, at least {MIN_FACES} are required")]
    TooFewFaces { token: String, faces: usize },
    #[error("die #{index} has {found} faces, expected {expected} like the first die")]
    FaceCountMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("{found} dice provided, at least {min} are required")]
    TooFewDice { min: usize, found: usize },
    #[error("face index {index} out of range for a die with {faces} faces")]
    FaceIndex { index: usize, faces: usize },
}

/// One die: an ordered sequence of integer faces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Die {
    faces: Box<[i64]>,
}

impl Die {
    /// Parse a comma-separated list of integers, e.g. `"1,2,3,4,5,6"`.
    pub fn parse(token: &str) -> Result<Self, DiceError> {
        let faces = token
            .split(',')
            .map(|piece| {
                let piece = piece.trim();
                piece.parse::<i64>().map_err(|_| DiceError::InvalidFace {
                    token: token.to_string(),
                    face: piece.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if faces.len() < MIN_FACES {
            return Err(DiceError::TooFewFaces {
                token: token.to_string(),
                faces: faces.len(),
            });
        }
        Ok(Self {
            faces: faces.into_boxed_slice(),
        })
    }

    pub fn from_faces(faces: Vec<i64>) -> Result<Self, DiceError> {
        if faces.len() < MIN_FACES {
            let token = faces
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(",");
            return Err(DiceError::TooFewFaces {
                token,
                faces: faces.len(),
            });
        }
        Ok(Self {
            faces: faces.into_boxed_slice(),
        })
    }

    pub fn faces(&self) -> &[i64] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Face shown when the die lands on `face_index`. Pure lookup.
    pub fn roll(&self, face_index: usize) -> Result<i64, DiceError> {
        self.faces
            .get(face_index)
            .copied()
            .ok_or(DiceError::FaceIndex {
                index: face_index,
                faces: self.faces.len(),
            })
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, face) in self.faces.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{face}")?;
        }
        Ok(())
    }
}

/// A validated dice configuration: non-empty, equal face counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceSet {
    dice: Vec<Die>,
}

impl DiceSet {
    pub fn new(dice: Vec<Die>) -> Result<Self, DiceError> {
        let first = dice.first().ok_or(DiceError::Empty)?;
        let expected = first.face_count();
        if let Some((index, die)) = dice
            .iter()
            .enumerate()
            .find(|(_, d)| d.face_count() != expected)
        {
            return Err(DiceError::FaceCountMismatch {
                index,
                expected,
                found: die.face_count(),
            });
        }
        Ok(Self { dice })
    }

    /// Parse one die per token, then validate the configuration as a whole.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, DiceError> {
        let dice = tokens
            .iter()
            .map(|t| Die::parse(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(dice)
    }

    /// The game needs a real choice among several dice; the model itself does not.
    pub fn require_at_least(&self, min: usize) -> Result<(), DiceError> {
        if self.dice.len() < min {
            return Err(DiceError::TooFewDice {
                min,
                found: self.dice.len(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// Shared face count of every die in the set.
    pub fn face_count(&self) -> usize {
        self.dice[0].face_count()
    }

    pub fn get(&self, index: usize) -> Option<&Die> {
        self.dice.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Die> {
        self.dice.iter()
    }

    pub fn as_slice(&self) -> &[Die] {
        &self.dice
    }
}

impl<'a> IntoIterator for &'a DiceSet {
    type Item = &'a Die;
    type IntoIter = std::slice::Iter<'a, Die>;

    fn into_iter(self) -> Self::IntoIter {
        self.dice.iter()
    }
}
