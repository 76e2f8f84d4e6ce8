use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The `categories` table.
///
/// External collaborator of the product catalog; this crate only needs the
/// identifier products reference, so the entity stays minimal.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Primary key: Unique identifier for the category.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Category name.
    pub name: String,

    /// Category description.
    pub description: Option<String>,

    /// Is the category active.
    pub is_active: bool,

    /// Timestamp when the category was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp when the category was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Define relations for the `categories` table.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A category has many products.
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates a new active category.
    pub fn new(name: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}
