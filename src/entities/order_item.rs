use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Monetary scale: 2 fractional digits, round half up.
const MONEY_DP: u32 = 2;
const MONEY_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// The `order_items` table.
///
/// A line item snapshots the product's price at creation time; it never
/// tracks later product price changes. `total_price` is derived and
/// recomputed by [`Model::recalculate_total_price`] after every mutation of
/// `quantity`, `unit_price`, `discount_amount`, or `tax_amount`. The one
/// exception is [`Model::override_total_price`], which writes the total
/// directly and raises `total_overridden` so later recomputes do not clobber
/// the manual correction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    /// Primary key: Unique identifier for the order item.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Foreign key referencing the product this line represents. Catalog
    /// lookup only; the pricing fields below are independent copies.
    #[sea_orm(column_type = "Uuid")]
    pub product_id: Uuid,

    /// Quantity of the product ordered.
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    /// Price per unit, snapshotted from the product at creation.
    #[validate(custom = "validate_decimal_non_negative")]
    pub unit_price: Decimal,

    /// Discount applied to the whole line.
    #[validate(custom = "validate_decimal_non_negative")]
    pub discount_amount: Decimal,

    /// Tax applied to the discounted subtotal.
    #[validate(custom = "validate_decimal_non_negative")]
    pub tax_amount: Decimal,

    /// Derived line total: (subtotal - discount) + tax.
    pub total_price: Decimal,

    /// True when `total_price` was corrected manually and must not be
    /// recomputed.
    pub total_overridden: bool,

    /// Timestamp when the line item was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp when the line item was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Define relations for the `order_items` table.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to a product.
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.discount_amount {
                active_model.discount_amount = Set(Decimal::ZERO);
            }
            if let ActiveValue::NotSet = active_model.tax_amount {
                active_model.tax_amount = Set(Decimal::ZERO);
            }
            if let ActiveValue::NotSet = active_model.total_overridden {
                active_model.total_overridden = Set(false);
            }
            if let ActiveValue::NotSet = active_model.total_price {
                active_model.total_price = Set(Decimal::ZERO);
            }

            active_model.created_at = Set(Utc::now());
        }

        active_model.updated_at = Set(Some(Utc::now()));

        let mut model: Model = active_model.clone().try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;

        // A record never reaches storage with a stale derived total.
        model.recalculate_total_price();
        active_model.total_price = Set(model.total_price);

        if let Err(err) = model.validate() {
            return Err(crate::errors::DomainError::from(err).into());
        }

        Ok(active_model)
    }
}

/// Implementation block for the `OrderItem` model.
impl Model {
    /// Creates a new order item and computes its total immediately.
    ///
    /// # Arguments
    ///
    /// * `product_id` - The UUID of the product this line represents.
    /// * `quantity` - The quantity ordered.
    /// * `unit_price` - The per-unit price snapshot.
    pub fn new(product_id: Uuid, quantity: i32, unit_price: Decimal) -> Self {
        let mut item = Self {
            id: Uuid::new_v4(),
            product_id,
            quantity,
            unit_price,
            discount_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_price: Decimal::ZERO,
            total_overridden: false,
            created_at: Utc::now(),
            updated_at: None,
        };
        item.recalculate_total_price();
        item
    }

    /// Creates a new order item for a product, snapshotting its effective
    /// price (discounted price when set, else list price).
    pub fn for_product(product: &super::product::Model, quantity: i32) -> Self {
        Self::new(product.id, quantity, product.effective_price())
    }

    /// Quantity times unit price, before discount and tax. Zero when the
    /// quantity is not positive.
    pub fn subtotal(&self) -> Decimal {
        if self.quantity > 0 {
            self.unit_price * Decimal::from(self.quantity)
        } else {
            Decimal::ZERO
        }
    }

    /// The single recompute root: `total_price = (subtotal - discount) + tax`,
    /// rounded to 2 fractional digits, half up. No-op while the total is
    /// manually overridden.
    pub fn recalculate_total_price(&mut self) {
        if self.total_overridden {
            return;
        }
        self.total_price = (self.subtotal() - self.discount_amount + self.tax_amount)
            .round_dp_with_strategy(MONEY_DP, MONEY_ROUNDING);
        tracing::debug!(
            order_item_id = %self.id,
            total_price = %self.total_price,
            "recomputed line total"
        );
    }

    /// Sets the line discount and recomputes the total. A discount larger
    /// than the subtotal is accepted as-is, never clamped.
    pub fn apply_discount(&mut self, amount: Decimal) {
        self.discount_amount = amount;
        self.touch();
        self.recalculate_total_price();
    }

    /// Computes the tax on the discounted subtotal at the given rate and
    /// recomputes the total.
    ///
    /// When the subtotal is zero the previous `tax_amount` is left in place
    /// rather than reset to zero.
    pub fn calculate_tax(&mut self, rate: Decimal) {
        if self.subtotal() > Decimal::ZERO {
            let taxable = self.subtotal() - self.discount_amount;
            self.tax_amount = (taxable * rate).round_dp_with_strategy(MONEY_DP, MONEY_ROUNDING);
            self.touch();
            self.recalculate_total_price();
        }
    }

    /// Updates the quantity and recomputes the total.
    pub fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity;
        self.touch();
        self.recalculate_total_price();
    }

    /// Updates the unit price and recomputes the total.
    pub fn set_unit_price(&mut self, unit_price: Decimal) {
        self.unit_price = unit_price;
        self.touch();
        self.recalculate_total_price();
    }

    /// Updates the discount and recomputes the total.
    pub fn set_discount_amount(&mut self, discount_amount: Decimal) {
        self.discount_amount = discount_amount;
        self.touch();
        self.recalculate_total_price();
    }

    /// Updates the tax amount and recomputes the total.
    pub fn set_tax_amount(&mut self, tax_amount: Decimal) {
        self.tax_amount = tax_amount;
        self.touch();
        self.recalculate_total_price();
    }

    /// Escape hatch for manually corrected totals: writes `total_price`
    /// directly, bypassing recomputation, and raises `total_overridden` so
    /// later field mutations do not clobber the correction.
    pub fn override_total_price(&mut self, total_price: Decimal) {
        self.total_price = total_price;
        self.total_overridden = true;
        self.touch();
        tracing::debug!(
            order_item_id = %self.id,
            total_price = %self.total_price,
            "line total manually overridden"
        );
    }

    /// Drops a manual override and recomputes the total from the fields.
    pub fn clear_total_override(&mut self) {
        self.total_overridden = false;
        self.touch();
        self.recalculate_total_price();
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

fn validate_decimal_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("Amount must be non-negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Helper function to create a valid line item: 3 units at 19.99.
    fn create_valid_item() -> Model {
        Model::new(Uuid::new_v4(), 3, dec!(19.99))
    }

    #[test]
    fn test_total_computed_at_creation() {
        let item = create_valid_item();
        assert!(item.validate().is_ok());
        assert_eq!(item.subtotal(), dec!(59.97));
        assert_eq!(item.total_price, dec!(59.97));
        assert!(item.updated_at.is_none());
    }

    #[test]
    fn test_discount_then_tax_cascade() {
        let mut item = create_valid_item();

        item.apply_discount(dec!(5.00));
        assert_eq!(item.total_price, dec!(54.97));

        // (59.97 - 5.00) * 0.07 = 3.8479, rounds half-up to 3.85.
        item.calculate_tax(dec!(0.07));
        assert_eq!(item.tax_amount, dec!(3.85));
        assert_eq!(item.total_price, dec!(58.82));
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let mut item = create_valid_item();
        item.apply_discount(dec!(5.00));
        item.calculate_tax(dec!(0.07));

        let total = item.total_price;
        item.recalculate_total_price();
        item.recalculate_total_price();
        assert_eq!(item.total_price, total);
    }

    #[test]
    fn test_over_discount_is_not_clamped() {
        let mut item = create_valid_item();
        item.apply_discount(dec!(100.00));
        assert_eq!(item.total_price, dec!(-40.03));
    }

    #[test]
    fn test_zero_subtotal_leaves_tax_untouched() {
        let mut item = create_valid_item();
        item.calculate_tax(dec!(0.07));
        let stale_tax = item.tax_amount;
        assert!(stale_tax > Decimal::ZERO);

        // Quantity dropped to zero: subtotal is zero, tax must stay stale.
        item.set_quantity(0);
        assert_eq!(item.subtotal(), Decimal::ZERO);
        item.calculate_tax(dec!(0.10));
        assert_eq!(item.tax_amount, stale_tax);
    }

    #[test]
    fn test_setters_trigger_recompute() {
        let mut item = create_valid_item();

        item.set_quantity(2);
        assert_eq!(item.total_price, dec!(39.98));

        item.set_unit_price(dec!(10.00));
        assert_eq!(item.total_price, dec!(20.00));

        item.set_discount_amount(dec!(2.50));
        assert_eq!(item.total_price, dec!(17.50));

        item.set_tax_amount(dec!(1.75));
        assert_eq!(item.total_price, dec!(19.25));

        assert!(item.updated_at.is_some());
    }

    #[test]
    fn test_override_bypasses_recompute() {
        let mut item = create_valid_item();
        item.override_total_price(dec!(42.00));
        assert_eq!(item.total_price, dec!(42.00));

        // Field mutations no longer clobber the manual correction.
        item.set_quantity(10);
        assert_eq!(item.total_price, dec!(42.00));

        item.clear_total_override();
        assert_eq!(item.total_price, dec!(199.90));
    }

    #[test]
    fn test_for_product_snapshots_effective_price() {
        let mut product = super::super::product::Model::new(
            "Mechanical Keyboard".to_string(),
            "KBD-001".to_string(),
            None,
            dec!(100.00),
            10,
            Uuid::new_v4(),
        );
        product.set_discounted_price(dec!(80.00));

        let item = Model::for_product(&product, 2);
        assert_eq!(item.product_id, product.id);
        assert_eq!(item.unit_price, dec!(80.00));
        assert_eq!(item.total_price, dec!(160.00));

        // Later product price changes do not reach the snapshot.
        product.set_price(dec!(500.00));
        product.clear_discounted_price();
        assert_eq!(item.unit_price, dec!(80.00));
    }

    #[test]
    fn test_validation_failures_per_field() {
        let mut item = create_valid_item();
        item.quantity = 0;
        item.unit_price = dec!(-1.00);
        item.discount_amount = dec!(-5.00);

        let validation = item.validate();
        assert!(validation.is_err());

        if let Err(e) = validation {
            let fields = e.field_errors();
            assert!(fields.contains_key("quantity"));
            assert!(fields.contains_key("unit_price"));
            assert!(fields.contains_key("discount_amount"));
        }
    }

    #[test]
    fn test_serializes_parent_reference_only() {
        // One-directional tree: the line item carries its product reference;
        // a product serializes no child list (see product::Model).
        let item = create_valid_item();
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("product_id").is_some());

        let product = super::super::product::Model::new(
            "Mechanical Keyboard".to_string(),
            "KBD-001".to_string(),
            None,
            dec!(100.00),
            10,
            Uuid::new_v4(),
        );
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("order_items").is_none());
        assert!(json.get("category_id").is_some());
    }
}
