//! Shared fixtures for unit tests.

use std::sync::LazyLock;

use crate::schema::{Entity, Field, Schema};

#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub name: String,
    pub score: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub active: bool,
    pub note: Option<String>,
    pub owner: Option<Owner>,
}

/// A flattened projection of `Item`, used for remapping tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: i64,
    pub title: String,
    pub owner_score: Option<i64>,
}

impl Item {
    pub const ID: Field<Self, i64> = Field::new("Id");
    pub const NAME: Field<Self, String> = Field::new("Name");
    pub const PRICE: Field<Self, f64> = Field::new("Price");
    pub const ACTIVE: Field<Self, bool> = Field::new("Active");
    pub const NOTE: Field<Self, Option<String>> = Field::new("Note");
    pub const OWNER_SCORE: Field<Self, Option<i64>> = Field::new("Owner.Score");
}

impl ItemView {
    pub const ID: Field<Self, i64> = Field::new("Id");
    pub const TITLE: Field<Self, String> = Field::new("Title");
    pub const OWNER_SCORE: Field<Self, Option<i64>> = Field::new("OwnerScore");
}

impl Entity for Owner {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<Owner>> = LazyLock::new(|| {
            Schema::builder("Owner")
                .property("Name", |o: &Owner| o.name.clone())
                .property("Score", |o: &Owner| o.score)
                .build()
        });
        &SCHEMA
    }
}

impl Entity for Item {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<Item>> = LazyLock::new(|| {
            Schema::builder("Item")
                .property("Id", |i: &Item| i.id)
                .property("Name", |i: &Item| i.name.clone())
                .property("Price", |i: &Item| i.price)
                .property("Active", |i: &Item| i.active)
                .property("Note", |i: &Item| i.note.clone())
                .nested("Owner", |i: &Item| i.owner.as_ref(), Owner::schema())
                .build()
        });
        &SCHEMA
    }
}

impl Entity for ItemView {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<ItemView>> = LazyLock::new(|| {
            Schema::builder("ItemView")
                .property("Id", |v: &ItemView| v.id)
                .property("Title", |v: &ItemView| v.title.clone())
                .property("OwnerScore", |v: &ItemView| v.owner_score)
                .build()
        });
        &SCHEMA
    }
}

/// Build an item with the given id. Other fields derive from the id.
#[must_use]
pub fn item(id: i64) -> Item {
    Item {
        id,
        name: format!("item-{id}"),
        #[allow(clippy::cast_precision_loss)]
        price: id as f64 * 1.5,
        active: id % 2 == 0,
        note: (id % 3 == 0).then(|| format!("note {id}")),
        owner: (id % 4 != 0).then(|| Owner {
            name: format!("owner-{}", id % 5),
            score: (id % 5 != 0).then_some(id % 7),
        }),
    }
}

/// Build items with ids in `range`.
#[must_use]
pub fn items(range: std::ops::Range<i64>) -> Vec<Item> {
    range.map(item).collect()
}

/// Ids of the given items, in order.
#[must_use]
pub fn ids<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<i64> {
    items.into_iter().map(|i| i.id).collect()
}
