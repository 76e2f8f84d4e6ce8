//! Persistent domain entities.
//!
//! Ownership is one-directional by construction: `OrderItem` references its
//! `Product` and `Product` references its `Category` via foreign-key fields;
//! no entity serializes a child list, so the object graph always flattens to
//! a tree.

pub mod category;
pub mod customer_tier;
pub mod order_item;
pub mod product;
