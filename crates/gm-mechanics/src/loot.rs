//! Weighted loot tables.
//!
//! A table is either a list of entries or an object with `entries` and an
//! optional `rolls` count (default 1). Each entry names an `item` (or
//! `name`), a `weight` (default 1), and a `quantity` given as an integer or a
//! dice expression (default 1). Entries without a name or with a
//! non-positive weight are skipped.

use gm_core::DataTables;
use gm_core::state::as_int;
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dice::DiceExpr;
use crate::error::{MechError, MechResult};

/// One weighted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootEntry {
    /// Item name.
    pub item: String,
    /// Relative weight, always positive.
    pub weight: u64,
    /// How many drop.
    pub quantity: DiceExpr,
}

/// A parsed loot table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootTable {
    /// Table name.
    pub name: String,
    /// Picks per roll.
    pub rolls: u32,
    /// Rollable entries.
    pub entries: Vec<LootEntry>,
}

impl LootTable {
    /// Parse a table value.
    pub fn from_value(name: &str, value: &Value) -> MechResult<Self> {
        let (items, rolls) = match value {
            Value::Array(items) => (items.as_slice(), 1),
            Value::Object(map) => {
                let items = map
                    .get("entries")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let rolls = map
                    .get("rolls")
                    .and_then(as_int)
                    .and_then(|n| u32::try_from(n).ok())
                    .unwrap_or(1);
                (items, rolls)
            }
            _ => (&[][..], 1),
        };

        let mut entries = Vec::new();
        for item in items {
            if let Some(entry) = parse_entry(item)? {
                entries.push(entry);
            } else {
                tracing::warn!(table = name, entry = %item, "skipping unusable loot entry");
            }
        }
        Ok(Self {
            name: name.to_string(),
            rolls,
            entries,
        })
    }

    /// Sum of all weights, saturating at `u64::MAX`.
    pub fn total_weight(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |total, e| total.saturating_add(e.weight))
    }

    /// Pick one entry by weight.
    pub fn pick(&self, rng: &mut StdRng) -> Option<&LootEntry> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }
        let mut roll = rng.random_range(0..total);
        self.entries.iter().find(|entry| {
            if roll < entry.weight {
                true
            } else {
                roll -= entry.weight;
                false
            }
        })
    }
}

fn parse_entry(value: &Value) -> MechResult<Option<LootEntry>> {
    let (item, weight, quantity) = match value {
        Value::String(item) => (Some(item.as_str()), None, None),
        Value::Object(map) => (
            ["item", "name"]
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_str)),
            map.get("weight"),
            map.get("quantity"),
        ),
        _ => (None, None, None),
    };
    let Some(item) = item.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let weight = match weight {
        None => 1,
        Some(w) => match as_int(w).and_then(|n| u64::try_from(n).ok()) {
            Some(n) if n > 0 => n,
            _ => return Ok(None),
        },
    };
    let quantity = match quantity {
        None => DiceExpr::flat(1),
        Some(Value::String(expr)) => expr.parse()?,
        Some(other) => as_int(other)
            .map(DiceExpr::flat)
            .ok_or_else(|| MechError::InvalidDice(other.to_string()))?,
    };
    Ok(Some(LootEntry {
        item: item.to_string(),
        weight,
        quantity,
    }))
}

/// One rolled drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootDrop {
    /// Item name.
    pub item: String,
    /// How many.
    pub quantity: i64,
}

/// Rolls named tables from [`DataTables`].
#[derive(Debug, Clone, Copy)]
pub struct LootRoller<'t> {
    tables: &'t DataTables,
}

impl<'t> LootRoller<'t> {
    /// Roll against these tables.
    pub fn new(tables: &'t DataTables) -> Self {
        Self { tables }
    }

    /// Parse a named table.
    pub fn table(&self, name: &str) -> MechResult<LootTable> {
        let value = self
            .tables
            .loot_table(name)
            .ok_or_else(|| MechError::UnknownLootTable(name.to_string()))?;
        LootTable::from_value(name, value)
    }

    /// Roll a named table. Drops whose quantity rolls below one are left out.
    pub fn roll(&self, name: &str, rng: &mut StdRng) -> MechResult<Vec<LootDrop>> {
        let table = self.table(name)?;
        if table.entries.is_empty() {
            return Err(MechError::EmptyLootTable(name.to_string()));
        }
        let mut drops = Vec::new();
        for _ in 0..table.rolls {
            let Some(entry) = table.pick(rng) else {
                continue;
            };
            let quantity = entry.quantity.roll(rng);
            if quantity > 0 {
                drops.push(LootDrop {
                    item: entry.item.clone(),
                    quantity,
                });
            }
        }
        tracing::debug!(table = name, drops = drops.len(), "loot rolled");
        Ok(drops)
    }
}
