use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::config::DomainConfig;

/// The `products` table.
///
/// Owns the pricing fields (`price`, `discounted_price`, `tax_rate`) and the
/// stock fields (`stock_quantity`, `reserved_quantity`, `reorder_level`),
/// together with the derived queries over them. Field constraints are
/// declarative and enforced in `before_save`; the derived queries assume
/// they already hold and never fail.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key: Unique identifier for the product.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// SKU (Stock Keeping Unit), unique across the catalog.
    #[validate(length(
        min = 1,
        max = 100,
        message = "SKU is required and cannot exceed 100 characters"
    ))]
    pub sku: String,

    /// Product name.
    #[validate(length(
        min = 2,
        max = 200,
        message = "Product name must be between 2 and 200 characters"
    ))]
    pub name: String,

    /// Product description.
    #[validate(length(
        min = 10,
        max = 2000,
        message = "Description must be between 10 and 2000 characters"
    ))]
    pub description: Option<String>,

    /// List price. Strictly positive.
    #[validate(custom = "validate_decimal_positive")]
    pub price: Decimal,

    /// Promotional price, charged instead of `price` when present. Not
    /// required to be below the list price.
    #[validate(custom = "validate_decimal_non_negative")]
    pub discounted_price: Option<Decimal>,

    /// Total units on hand.
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: i32,

    /// Units held for pending orders.
    #[validate(range(min = 0, message = "Reserved quantity cannot be negative"))]
    pub reserved_quantity: i32,

    /// Threshold at or below which available stock counts as low.
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: i32,

    /// Tax rate as a decimal fraction (e.g. 0.07 for 7%).
    #[validate(custom = "validate_unit_interval")]
    pub tax_rate: Decimal,

    /// Is the product active in the catalog.
    pub is_active: bool,

    /// Is the product featured.
    pub is_featured: bool,

    /// Product brand.
    #[validate(length(max = 100, message = "Brand name cannot exceed 100 characters"))]
    pub brand: Option<String>,

    /// Weight in kilograms.
    pub weight_kg: Option<Decimal>,

    /// URL to the primary product image.
    #[validate(
        url(message = "Image URL must be a valid URL"),
        length(max = 500, message = "Image URL cannot exceed 500 characters")
    )]
    pub image_url: Option<String>,

    /// Foreign key referencing the category this product belongs to.
    #[sea_orm(column_type = "Uuid")]
    pub category_id: Uuid,

    /// Timestamp when the product was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp when the product was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Define relations for the `products` table.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A product belongs to a category.
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Category,

    /// A product is referenced by many order items.
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
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
            let defaults = DomainConfig::default();

            if let ActiveValue::NotSet = active_model.is_active {
                active_model.is_active = Set(true);
            }
            if let ActiveValue::NotSet = active_model.is_featured {
                active_model.is_featured = Set(false);
            }
            if let ActiveValue::NotSet = active_model.reserved_quantity {
                active_model.reserved_quantity = Set(0);
            }
            if let ActiveValue::NotSet = active_model.reorder_level {
                active_model.reorder_level = Set(defaults.default_reorder_level);
            }
            if let ActiveValue::NotSet = active_model.tax_rate {
                active_model.tax_rate = Set(defaults.default_tax_rate);
            }
            if let ActiveValue::NotSet = active_model.discounted_price {
                active_model.discounted_price = Set(None);
            }
            if let ActiveValue::NotSet = active_model.description {
                active_model.description = Set(None);
            }
            if let ActiveValue::NotSet = active_model.brand {
                active_model.brand = Set(None);
            }
            if let ActiveValue::NotSet = active_model.weight_kg {
                active_model.weight_kg = Set(None);
            }
            if let ActiveValue::NotSet = active_model.image_url {
                active_model.image_url = Set(None);
            }

            active_model.created_at = Set(Utc::now());
        }

        active_model.updated_at = Set(Some(Utc::now()));

        let model: Model = active_model.clone().try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;

        if let Err(err) = model.validate() {
            return Err(crate::errors::DomainError::from(err).into());
        }

        Ok(active_model)
    }
}

/// Implementation block for the `Product` model.
impl Model {
    /// Creates a new product with catalog defaults for the optional fields.
    ///
    /// # Arguments
    ///
    /// * `name` - The product name.
    /// * `sku` - The unique stock keeping unit.
    /// * `description` - Optional product description.
    /// * `price` - The list price.
    /// * `stock_quantity` - Units on hand.
    /// * `category_id` - The UUID of the category this product belongs to.
    pub fn new(
        name: String,
        sku: String,
        description: Option<String>,
        price: Decimal,
        stock_quantity: i32,
        category_id: Uuid,
    ) -> Self {
        let defaults = DomainConfig::default();
        Self {
            id: Uuid::new_v4(),
            sku,
            name,
            description,
            price,
            discounted_price: None,
            stock_quantity,
            reserved_quantity: 0,
            reorder_level: defaults.default_reorder_level,
            tax_rate: defaults.default_tax_rate,
            is_active: true,
            is_featured: false,
            brand: None,
            weight_kg: None,
            image_url: None,
            category_id,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// The price actually charged: the discounted price when one is set,
    /// otherwise the list price.
    pub fn effective_price(&self) -> Decimal {
        self.discounted_price.unwrap_or(self.price)
    }

    /// Units on hand minus units reserved for pending orders. Negative means
    /// oversold; the value is never clamped.
    pub fn available_stock(&self) -> i32 {
        self.stock_quantity - self.reserved_quantity
    }

    /// True when available stock has fallen to the reorder level or below.
    pub fn is_low_stock(&self) -> bool {
        self.available_stock() <= self.reorder_level
    }

    /// True when at least one unit is available.
    pub fn is_in_stock(&self) -> bool {
        self.available_stock() > 0
    }

    /// Updates the list price.
    pub fn set_price(&mut self, price: Decimal) {
        self.price = price;
        self.touch();
    }

    /// Sets the promotional price.
    pub fn set_discounted_price(&mut self, discounted_price: Decimal) {
        self.discounted_price = Some(discounted_price);
        self.touch();
    }

    /// Removes the promotional price; `effective_price` falls back to the
    /// list price.
    pub fn clear_discounted_price(&mut self) {
        self.discounted_price = None;
        self.touch();
    }

    /// Updates the tax rate.
    pub fn set_tax_rate(&mut self, tax_rate: Decimal) {
        self.tax_rate = tax_rate;
        self.touch();
    }

    /// Updates the on-hand stock level.
    pub fn set_stock_quantity(&mut self, stock_quantity: i32) {
        self.stock_quantity = stock_quantity;
        self.touch();
        self.warn_if_oversold();
    }

    /// Updates the reserved stock level.
    pub fn set_reserved_quantity(&mut self, reserved_quantity: i32) {
        self.reserved_quantity = reserved_quantity;
        self.touch();
        self.warn_if_oversold();
    }

    /// Updates the reorder threshold.
    pub fn set_reorder_level(&mut self, reorder_level: i32) {
        self.reorder_level = reorder_level;
        self.touch();
    }

    /// Activates or deactivates the product.
    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    fn warn_if_oversold(&self) {
        let available = self.available_stock();
        if available < 0 {
            tracing::warn!(
                product_id = %self.id,
                sku = %self.sku,
                available,
                "product is oversold"
            );
        }
    }
}

fn validate_decimal_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("Price must be greater than 0"));
    }
    Ok(())
}

fn validate_decimal_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("Amount must be non-negative"));
    }
    Ok(())
}

fn validate_unit_interval(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE {
        return Err(ValidationError::new("Tax rate must be between 0.0 and 1.0"));
    }
    Ok(())
}
