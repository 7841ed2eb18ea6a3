use serde_json::{json, Value};

use crate::database::models::PropertyType;

/// Inclusive price bounds; either side may be open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceRange {
    pub gte: Option<i64>,
    pub lte: Option<i64>,
}

/// Listing filter as received from the outside. Absent fields contribute no
/// conditions, so the generated WHERE shape mirrors the filter exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeFilter {
    pub city: Option<String>,
    pub price: Option<PriceRange>,
    pub property_type: Option<PropertyType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

impl HomeFilter {
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.property_type.is_none()
            && !matches!(&self.price, Some(p) if p.gte.is_some() || p.lte.is_some())
    }

    /// Render the filter as a parameterized WHERE fragment. Parameter
    /// placeholders are numbered from `starting_param_index + 1` so the
    /// fragment can be appended after existing binds.
    pub fn to_where_sql(&self, starting_param_index: usize) -> SqlResult {
        let mut conditions: Vec<String> = vec![];
        let mut params: Vec<Value> = vec![];
        let mut index = starting_param_index;

        if let Some(city) = &self.city {
            index += 1;
            conditions.push(format!("\"city\" = ${}", index));
            params.push(json!(city));
        }

        if let Some(price) = &self.price {
            if let Some(gte) = price.gte {
                index += 1;
                conditions.push(format!("\"price\" >= ${}", index));
                params.push(json!(gte));
            }
            if let Some(lte) = price.lte {
                index += 1;
                conditions.push(format!("\"price\" <= ${}", index));
                params.push(json!(lte));
            }
        }

        if let Some(property_type) = self.property_type {
            index += 1;
            // Bound as text, cast to the Postgres enum
            conditions.push(format!("\"property_type\" = ${}::property_type", index));
            params.push(json!(property_type));
        }

        let query = if conditions.is_empty() {
            "1=1".to_string()
        } else {
            conditions.join(" AND ")
        };

        SqlResult { query, params }
    }
}
