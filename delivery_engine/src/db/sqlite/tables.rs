use crate::db::traits::StoreError;

/// The table name used for each entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub users: String,
    pub delivery_addresses: String,
    pub products: String,
    pub categories: String,
    pub ads: String,
    pub orders: String,
    pub order_items: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            users: "users".into(),
            delivery_addresses: "delivery_addresses".into(),
            products: "products".into(),
            categories: "categories".into(),
            ads: "ads".into(),
            orders: "orders".into(),
            order_items: "order_items".into(),
        }
    }
}

impl TableNames {
    fn all(&self) -> [&str; 7] {
        [
            &self.users,
            &self.delivery_addresses,
            &self.products,
            &self.categories,
            &self.ads,
            &self.orders,
            &self.order_items,
        ]
    }

    /// Table names are interpolated into SQL, so only plain identifiers are accepted.
    pub fn validate(&self) -> Result<(), StoreError> {
        let names = self.all();
        for name in names {
            let valid = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') &&
                name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return Err(StoreError::ConfigurationError(format!("'{name}' is not a valid table name")));
            }
        }
        for (i, name) in names.iter().enumerate() {
            if names[i + 1..].contains(name) {
                return Err(StoreError::ConfigurationError(format!("Table name '{name}' is used more than once")));
            }
        }
        Ok(())
    }
}
