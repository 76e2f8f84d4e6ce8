use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed set of customer loyalty tiers.
///
/// Pure lookup table: each tier carries a display name and the minimum
/// loyalty-point threshold that earns it. No other behavior.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CustomerTier {
    #[sea_orm(string_value = "Bronze")]
    Bronze,
    #[sea_orm(string_value = "Silver")]
    Silver,
    #[sea_orm(string_value = "Gold")]
    Gold,
    #[sea_orm(string_value = "Platinum")]
    Platinum,
}

impl CustomerTier {
    /// Human-readable tier name.
    pub fn display_name(&self) -> &'static str {
        match self {
            CustomerTier::Bronze => "Bronze",
            CustomerTier::Silver => "Silver",
            CustomerTier::Gold => "Gold",
            CustomerTier::Platinum => "Platinum",
        }
    }

    /// Minimum loyalty points required for the tier.
    pub fn minimum_points(&self) -> u32 {
        match self {
            CustomerTier::Bronze => 0,
            CustomerTier::Silver => 1000,
            CustomerTier::Gold => 5000,
            CustomerTier::Platinum => 10_000,
        }
    }
}
