#![forbid(unsafe_code)]

//! Synthetic inventory records.

use shelf::{ColumnSetting, FieldValue, Record};

const ADJECTIVES: [&str; 8] = [
    "Brass", "Oak", "Steel", "Walnut", "Copper", "Maple", "Iron", "Cedar",
];
const NOUNS: [&str; 8] = [
    "Hinge", "Plank", "Bracket", "Dowel", "Handle", "Panel", "Bolt", "Shelf",
];
const CATEGORIES: [&str; 4] = ["Hardware", "Lumber", "Fasteners", "Fixtures"];

/// One stocked item.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    /// Stable identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Stock-keeping unit.
    pub sku: String,
    /// Category, if assigned.
    pub category: Option<String>,
    /// Units on hand.
    pub quantity: u32,
    /// Unit price.
    pub price: f64,
    /// Listed for sale.
    pub active: bool,
    /// Last update, RFC 3339.
    pub updated_at: String,
}

impl Record for InventoryItem {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => FieldValue::Number(self.id as f64),
            "name" => FieldValue::text(&self.name),
            "sku" => FieldValue::text(&self.sku),
            "category" => self.category.as_deref().into(),
            "quantity" => self.quantity.into(),
            "price" => self.price.into(),
            "active" => self.active.into(),
            "updatedAt" => FieldValue::text(&self.updated_at),
            _ => FieldValue::Null,
        }
    }
}

/// Deterministic linear congruential generator.
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }
}

/// Generate `count` items. The same seed yields the same inventory.
#[must_use]
pub fn generate(count: usize, seed: u64) -> Vec<InventoryItem> {
    let mut rng = Lcg::new(seed);
    (0..count as u64)
        .map(|id| {
            let adjective = ADJECTIVES[rng.below(ADJECTIVES.len() as u64) as usize];
            let noun = NOUNS[rng.below(NOUNS.len() as u64) as usize];
            let category = match rng.below(5) {
                4 => None,
                c => Some(CATEGORIES[c as usize].to_string()),
            };
            let month = rng.below(12) + 1;
            let day = rng.below(28) + 1;
            let hour = rng.below(24);
            InventoryItem {
                id,
                name: format!("{adjective} {noun} {id}"),
                sku: format!("{}-{:06}", &noun[..3].to_uppercase(), id),
                category,
                quantity: rng.below(500) as u32,
                price: rng.below(20_000) as f64 / 100.0,
                active: rng.below(10) != 0,
                updated_at: format!("2024-{month:02}-{day:02}T{hour:02}:00:00Z"),
            }
        })
        .collect()
}

/// Table columns for inventory items.
#[must_use]
pub fn default_columns() -> Vec<ColumnSetting> {
    vec![
        ColumnSetting::new("name", "Name", 240),
        ColumnSetting::new("sku", "SKU", 120),
        ColumnSetting::new("category", "Category", 140),
        ColumnSetting::new("quantity", "Qty", 80),
        ColumnSetting::new("price", "Price", 100),
        ColumnSetting::new("updatedAt", "Updated", 200).hidden(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf::{SortConfig, SortField, apply_sort};

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate(50, 7), generate(50, 7));
        assert_ne!(generate(50, 7), generate(50, 8));
        let items = generate(50, 7);
        assert!(items.iter().enumerate().all(|(i, item)| item.id == i as u64));
    }

    #[test]
    fn fields_are_typed() {
        let item = &generate(1, 1)[0];
        assert!(matches!(item.field("price"), FieldValue::Number(_)));
        assert!(matches!(item.field("active"), FieldValue::Bool(_)));
        assert!(item.field("updatedAt").as_text().is_some());
        assert!(item.field("nope").is_null());
    }

    #[test]
    fn sorts_by_date_field() {
        let items = generate(200, 3);
        let sorted = apply_sort(&items, &SortConfig::new(SortField::desc("updatedAt")));
        assert!(
            sorted
                .windows(2)
                .all(|w| w[0].updated_at >= w[1].updated_at)
        );
    }

    #[test]
    fn default_columns_have_one_hidden() {
        let columns = default_columns();
        assert_eq!(columns.iter().filter(|c| !c.visible).count(), 1);
        let item = InventoryItem {
            category: Some("Lumber".into()),
            ..generate(1, 1).remove(0)
        };
        assert!(columns.iter().all(|c| !item.field(&c.key).is_null()));
    }
}
