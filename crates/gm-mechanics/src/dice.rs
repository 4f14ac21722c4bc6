//! Dice expressions such as `d20`, `2d6+1`, or a flat `3`.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::rngs::StdRng;

use crate::error::MechError;

/// `count` dice of `sides` sides plus a flat `bonus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceExpr {
    /// Number of dice.
    pub count: u32,
    /// Sides per die.
    pub sides: u32,
    /// Flat modifier.
    pub bonus: i64,
}

impl DiceExpr {
    /// A single d20.
    pub const D20: Self = Self {
        count: 1,
        sides: 20,
        bonus: 0,
    };

    /// A constant with no dice.
    pub fn flat(value: i64) -> Self {
        Self {
            count: 0,
            sides: 0,
            bonus: value,
        }
    }

    /// Smallest possible result.
    pub fn min(&self) -> i64 {
        i64::from(self.count) + self.bonus
    }

    /// Largest possible result.
    pub fn max(&self) -> i64 {
        i64::from(self.count) * i64::from(self.sides) + self.bonus
    }

    /// Roll the expression.
    pub fn roll(&self, rng: &mut StdRng) -> i64 {
        let dice: i64 = (0..self.count)
            .map(|_| i64::from(rng.random_range(1..=self.sides)))
            .sum();
        dice + self.bonus
    }
}

impl FromStr for DiceExpr {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MechError::InvalidDice(s.to_string());
        let text: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let text = text.to_lowercase();
        if text.is_empty() {
            return Err(invalid());
        }

        let Some((count, rest)) = text.split_once('d') else {
            return text.parse().map(Self::flat).map_err(|_| invalid());
        };
        let count = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| invalid())?
        };
        let (sides, bonus) = match rest.find(['+', '-']) {
            Some(at) => {
                let (sides, bonus) = rest.split_at(at);
                let bonus = bonus
                    .strip_prefix('+')
                    .unwrap_or(bonus)
                    .parse::<i64>()
                    .map_err(|_| invalid())?;
                (sides, bonus)
            }
            None => (rest, 0),
        };
        let sides: u32 = sides.parse().map_err(|_| invalid())?;
        if sides < 2 {
            return Err(invalid());
        }
        Ok(Self {
            count,
            sides,
            bonus,
        })
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(f, "{}", self.bonus);
        }
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.bonus {
            0 => Ok(()),
            b if b > 0 => write!(f, "+{b}"),
            b => write!(f, "{b}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn parses_common_forms() {
        assert_eq!("d20".parse::<DiceExpr>().unwrap(), DiceExpr::D20);
        assert_eq!(
            "2d6+1".parse::<DiceExpr>().unwrap(),
            DiceExpr {
                count: 2,
                sides: 6,
                bonus: 1
            }
        );
        assert_eq!(
            " 3D8 - 2 ".parse::<DiceExpr>().unwrap(),
            DiceExpr {
                count: 3,
                sides: 8,
                bonus: -2
            }
        );
        assert_eq!("5".parse::<DiceExpr>().unwrap(), DiceExpr::flat(5));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "d", "d1", "xd6", "2d6+", "gold"] {
            assert!(bad.parse::<DiceExpr>().is_err(), "{bad}");
        }
    }

    #[test]
    fn rolls_stay_in_range() {
        let expr: DiceExpr = "3d6+2".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let v = expr.roll(&mut rng);
            assert!((expr.min()..=expr.max()).contains(&v));
        }
        assert_eq!(DiceExpr::flat(4).roll(&mut rng), 4);
    }

    #[test]
    fn display() {
        assert_eq!(DiceExpr::D20.to_string(), "1d20");
        assert_eq!("2d6-1".parse::<DiceExpr>().unwrap().to_string(), "2d6-1");
        assert_eq!(DiceExpr::flat(3).to_string(), "3");
    }
}
