pub mod coercion;
pub mod normalizer;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

pub use normalizer::normalize_rent_roll;

/// A single unit after coercion of the raw extraction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalUnit {
    /// Unit label, `Unit-{n}` when the source had none
    pub unit_id: String,
    /// Contract rent per month; `None` when unparseable
    pub monthly_rent: Option<Money>,
    pub occupied: bool,
    #[serde(default)]
    pub square_feet: Option<Decimal>,
}

/// Validated rent roll. Built once per raw input and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRentRoll {
    pub property_name: String,
    pub address: String,
    #[serde(default)]
    pub purchase_price: Option<Money>,
    /// Count of units actually parsed; authoritative over any reported count
    pub total_units: usize,
    pub units: Vec<CanonicalUnit>,
    /// 1 - occupied / total_units, 4 dp; zero when there are no units
    pub vacancy_rate: Rate,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl CanonicalRentRoll {
    pub fn occupied_units(&self) -> usize {
        self.units.iter().filter(|u| u.occupied).count()
    }

    /// Known monthly rents, skipping units whose rent could not be parsed.
    pub fn known_rents(&self) -> impl Iterator<Item = Money> + '_ {
        self.units.iter().filter_map(|u| u.monthly_rent)
    }
}
