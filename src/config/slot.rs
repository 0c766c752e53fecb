// src/config/slot.rs
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::InputError;

/// A build-order position. Declaration order is the selection order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Item1,
    Boots,
    Item2,
    Item3,
    Item4,
    Item5,
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::Item1, Slot::Boots, Slot::Item2, Slot::Item3, Slot::Item4, Slot::Item5,
    ];

    /// Identifier accepted on input and used for capture files.
    pub fn key(self) -> &'static str {
        match self {
            Slot::Item1 => "item1",
            Slot::Boots => "boots",
            Slot::Item2 => "item2",
            Slot::Item3 => "item3",
            Slot::Item4 => "item4",
            Slot::Item5 => "item5",
        }
    }

    /// Human label used in the build payload.
    pub fn pretty(self) -> &'static str {
        match self {
            Slot::Item1 => "Item 1",
            Slot::Boots => "Boots",
            Slot::Item2 => "Item 2",
            Slot::Item3 => "Item 3",
            Slot::Item4 => "Item 4",
            Slot::Item5 => "Item 5",
        }
    }

    /// Export file name suffix. Same as the key today.
    pub fn suffix(self) -> &'static str { self.key() }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Slot {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let k = s.trim().to_ascii_lowercase();
        Slot::ALL
            .into_iter()
            .find(|slot| slot.key() == k)
            .ok_or_else(|| InputError::UnknownSlot(s.trim().to_string()))
    }
}

/// Parse a comma/whitespace separated list of slot keys. `all` anywhere in the
/// list selects every slot. Output is de-duplicated and sorted into selection order.
pub fn parse_slots(list: &str) -> Result<Vec<Slot>, InputError> {
    let mut out = Vec::new();
    for part in list.split(|c: char| c == ',' || c.is_whitespace()) {
        if part.is_empty() { continue; }
        if part.eq_ignore_ascii_case("all") {
            out.extend(Slot::ALL);
            continue;
        }
        out.push(part.parse::<Slot>()?);
    }
    if out.is_empty() {
        return Err(InputError::NoSlots);
    }
    out.sort_unstable();
    out.dedup();
    Ok(out)
}
