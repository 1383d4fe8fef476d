use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::types::{HousingUnit, OwnerType, Usage};

/// Per-owner unit counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct OwnerCounts {
    pub corporate: u32,
    pub individual: u32,
    pub homeowner: u32,
    pub unowned: u32,
}

impl OwnerCounts {
    pub fn get(&self, owner: OwnerType) -> u32 {
        match owner {
            OwnerType::Corporate => self.corporate,
            OwnerType::Individual => self.individual,
            OwnerType::Homeowner => self.homeowner,
            OwnerType::Unowned => self.unowned,
        }
    }

    fn bump(&mut self, owner: OwnerType) {
        match owner {
            OwnerType::Corporate => self.corporate += 1,
            OwnerType::Individual => self.individual += 1,
            OwnerType::Homeowner => self.homeowner += 1,
            OwnerType::Unowned => self.unowned += 1,
        }
    }
}

/// Ordered housing stock. Append-only: units are never removed, and index
/// equals id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct HousingStock {
    units: Vec<HousingUnit>,
}

impl HousingStock {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            units: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[HousingUnit] {
        &self.units
    }

    pub fn iter(&self) -> impl Iterator<Item = &HousingUnit> {
        self.units.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut HousingUnit> {
        self.units.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&HousingUnit> {
        self.units.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut HousingUnit> {
        self.units.get_mut(index)
    }

    /// Id the next constructed unit will receive.
    pub fn next_id(&self) -> u32 {
        self.units.len() as u32
    }

    /// Append a unit with the next sequential id and return its index.
    pub(crate) fn push(&mut self, owner: OwnerType, usage: Usage, price: f64) -> usize {
        let index = self.units.len();
        self.units
            .push(HousingUnit::new(self.next_id(), owner, usage, price));
        index
    }

    pub fn owner_counts(&self) -> OwnerCounts {
        let mut counts = OwnerCounts::default();
        for unit in &self.units {
            counts.bump(unit.owner);
        }
        counts
    }

    pub fn count_owner(&self, owner: OwnerType) -> usize {
        self.units.iter().filter(|u| u.owner == owner).count()
    }

    pub fn count_short_term(&self) -> usize {
        self.units.iter().filter(|u| u.is_short_term()).count()
    }

    /// Non-owner-occupied long-term rentals.
    pub fn count_available_rentals(&self) -> usize {
        self.units.iter().filter(|u| u.is_available_rental()).count()
    }

    fn ratio(&self, count: usize) -> f64 {
        if self.units.is_empty() {
            0.0
        } else {
            count as f64 / self.units.len() as f64
        }
    }

    /// Corporate units / all units.
    pub fn corporate_ratio(&self) -> f64 {
        self.ratio(self.count_owner(OwnerType::Corporate))
    }

    /// Short-term rentals / all units.
    pub fn short_term_ratio(&self) -> f64 {
        self.ratio(self.count_short_term())
    }

    /// Indices of units held by `owner`, in stock order.
    pub fn indices_owned_by(&self, owner: OwnerType) -> Vec<usize> {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.owner == owner)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of available long-term rentals, in stock order.
    pub fn available_rental_indices(&self) -> Vec<usize> {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.is_available_rental())
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
impl FromIterator<HousingUnit> for HousingStock {
    fn from_iter<I: IntoIterator<Item = HousingUnit>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().collect(),
        }
    }
}
