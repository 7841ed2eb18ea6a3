use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::database::models::{Home, HomeSummary, Image, PropertyType, User, UserProfile};
use crate::database::query::bind_value;
use crate::error::ApiError;
use crate::filter::{HomeFilter, SqlResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHomeParams {
    pub address: String,
    pub city: String,
    pub price: i64,
    pub property_type: PropertyType,
    pub number_of_bedrooms: i32,
    pub number_of_bathrooms: i32,
    pub land_size: i32,
    pub images: Vec<ImageUrl>,
}

/// Partial update: absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHomeParams {
    pub address: Option<String>,
    pub city: Option<String>,
    pub price: Option<i64>,
    pub property_type: Option<PropertyType>,
    pub number_of_bedrooms: Option<i32>,
    pub number_of_bathrooms: Option<i32>,
    pub land_size: Option<i32>,
}

/// Home detail view: the listing plus its full image gallery.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeDetail {
    #[serde(flatten)]
    pub home: Home,
    pub images: Vec<Image>,
}

const HOME_SUMMARY_SELECT: &str = "SELECT h.\"id\", h.\"address\", h.\"city\", h.\"price\", \
     h.\"property_type\", h.\"number_of_bedrooms\", h.\"number_of_bathrooms\", h.\"land_size\", \
     h.\"realtor_id\", \
     (SELECT i.\"url\" FROM \"images\" i WHERE i.\"home_id\" = h.\"id\" ORDER BY i.\"id\" LIMIT 1) AS \"image\" \
     FROM \"homes\" h";

/// Listing CRUD gated by realtor ownership.
#[derive(Clone)]
pub struct HomeService {
    pool: PgPool,
}

impl HomeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List homes matching the filter, each with its thumbnail image.
    /// Zero matches is NotFound, mirroring the external contract.
    pub async fn get_homes(&self, filter: &HomeFilter) -> Result<Vec<HomeSummary>, ApiError> {
        let where_sql = filter.to_where_sql(0);
        let sql = format!("{} WHERE {} ORDER BY h.\"id\"", HOME_SUMMARY_SELECT, where_sql.query);

        let mut query = sqlx::query_as::<_, HomeSummary>(&sql);
        for param in &where_sql.params {
            query = bind_value(query, param);
        }

        let homes = query.fetch_all(&self.pool).await?;
        if homes.is_empty() {
            return Err(ApiError::not_found("No homes match the given filters"));
        }
        Ok(homes)
    }

    pub async fn get_home_by_id(&self, id: i64) -> Result<HomeDetail, ApiError> {
        let home = self.home_by_id(id).await?;
        let images = sqlx::query_as::<_, Image>(
            "SELECT * FROM \"images\" WHERE \"home_id\" = $1 ORDER BY \"id\"",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(HomeDetail { home, images })
    }

    /// Insert the listing and its images in one transaction so a failed
    /// image write cannot leave a half-created listing behind.
    pub async fn create_home(
        &self,
        params: CreateHomeParams,
        realtor_id: i64,
    ) -> Result<Home, ApiError> {
        let mut tx = self.pool.begin().await?;

        let home: Home = sqlx::query_as(
            "INSERT INTO \"homes\" (\"address\", \"city\", \"price\", \"property_type\", \
             \"number_of_bedrooms\", \"number_of_bathrooms\", \"land_size\", \"realtor_id\") \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&params.address)
        .bind(&params.city)
        .bind(params.price)
        .bind(params.property_type)
        .bind(params.number_of_bedrooms)
        .bind(params.number_of_bathrooms)
        .bind(params.land_size)
        .bind(realtor_id)
        .fetch_one(&mut *tx)
        .await?;

        for image in &params.images {
            sqlx::query("INSERT INTO \"images\" (\"url\", \"home_id\") VALUES ($1, $2)")
                .bind(&image.url)
                .bind(home.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(home_id = home.id, realtor_id, "created home listing");
        Ok(home)
    }

    /// Apply the provided field changes to a listing the caller owns.
    pub async fn update_home_by_id(
        &self,
        id: i64,
        params: UpdateHomeParams,
        realtor_id: i64,
    ) -> Result<Home, ApiError> {
        let home = self.home_by_id(id).await?;
        self.check_ownership(&home, realtor_id)?;

        let Some(update_sql) = Self::update_sql(id, &params) else {
            // Nothing to change
            return Ok(home);
        };

        let mut query = sqlx::query_as::<_, Home>(&update_sql.query);
        for param in &update_sql.params {
            query = bind_value(query, param);
        }
        let updated = query.fetch_one(&self.pool).await?;
        Ok(updated)
    }

    /// Delete a listing the caller owns. Image rows cascade.
    pub async fn delete_home_by_id(&self, id: i64, realtor_id: i64) -> Result<Home, ApiError> {
        let home = self.home_by_id(id).await?;
        self.check_ownership(&home, realtor_id)?;

        sqlx::query("DELETE FROM \"homes\" WHERE \"id\" = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(home_id = id, realtor_id, "deleted home listing");
        Ok(home)
    }

    /// Public profile of the listing's owning realtor.
    pub async fn get_realtor_by_home_id(&self, id: i64) -> Result<UserProfile, ApiError> {
        let home = self.home_by_id(id).await?;
        let realtor = sqlx::query_as::<_, User>("SELECT * FROM \"users\" WHERE \"id\" = $1")
            .bind(home.realtor_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Realtor not found"))?;
        Ok(UserProfile::from(realtor))
    }

    async fn home_by_id(&self, id: i64) -> Result<Home, ApiError> {
        sqlx::query_as::<_, Home>("SELECT * FROM \"homes\" WHERE \"id\" = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Home not found"))
    }

    fn check_ownership(&self, home: &Home, realtor_id: i64) -> Result<(), ApiError> {
        if home.realtor_id != realtor_id {
            return Err(ApiError::unauthorized(
                "Only the listing realtor may modify this home",
            ));
        }
        Ok(())
    }

    /// Build the dynamic UPDATE statement for the provided fields, or None
    /// when the params are empty. The home id is the final parameter.
    fn update_sql(id: i64, params: &UpdateHomeParams) -> Option<SqlResult> {
        let mut sets: Vec<String> = vec![];
        let mut values: Vec<Value> = vec![];

        let push = |column: &str, cast: &str, value: Value, sets: &mut Vec<String>, values: &mut Vec<Value>| {
            values.push(value);
            sets.push(format!("\"{}\" = ${}{}", column, values.len(), cast));
        };

        if let Some(address) = &params.address {
            push("address", "", json!(address), &mut sets, &mut values);
        }
        if let Some(city) = &params.city {
            push("city", "", json!(city), &mut sets, &mut values);
        }
        if let Some(price) = params.price {
            push("price", "", json!(price), &mut sets, &mut values);
        }
        if let Some(property_type) = params.property_type {
            push("property_type", "::property_type", json!(property_type), &mut sets, &mut values);
        }
        if let Some(bedrooms) = params.number_of_bedrooms {
            push("number_of_bedrooms", "", json!(bedrooms), &mut sets, &mut values);
        }
        if let Some(bathrooms) = params.number_of_bathrooms {
            push("number_of_bathrooms", "", json!(bathrooms), &mut sets, &mut values);
        }
        if let Some(land_size) = params.land_size {
            push("land_size", "", json!(land_size), &mut sets, &mut values);
        }

        if sets.is_empty() {
            return None;
        }

        sets.push("\"updated_at\" = now()".to_string());
        values.push(json!(id));
        let query = format!(
            "UPDATE \"homes\" SET {} WHERE \"id\" = ${} RETURNING *",
            sets.join(", "),
            values.len()
        );

        Some(SqlResult { query, params: values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_sql_is_none_for_empty_params() {
        assert!(HomeService::update_sql(7, &UpdateHomeParams::default()).is_none());
    }

    #[test]
    fn update_sql_includes_only_provided_fields() {
        let params = UpdateHomeParams {
            price: Some(2_000_000),
            city: Some("Keffi".to_string()),
            ..Default::default()
        };
        let sql = HomeService::update_sql(7, &params).unwrap();
        assert_eq!(
            sql.query,
            "UPDATE \"homes\" SET \"city\" = $1, \"price\" = $2, \"updated_at\" = now() \
             WHERE \"id\" = $3 RETURNING *"
        );
        assert_eq!(sql.params, vec![json!("Keffi"), json!(2_000_000), json!(7)]);
    }

    #[test]
    fn update_sql_casts_property_type() {
        let params = UpdateHomeParams {
            property_type: Some(PropertyType::Condo),
            ..Default::default()
        };
        let sql = HomeService::update_sql(3, &params).unwrap();
        assert!(sql.query.contains("\"property_type\" = $1::property_type"));
        assert_eq!(sql.params, vec![json!("CONDO"), json!(3)]);
    }

    #[test]
    fn summary_select_takes_first_image_as_thumbnail() {
        assert!(HOME_SUMMARY_SELECT.contains("ORDER BY i.\"id\" LIMIT 1"));
        assert!(HOME_SUMMARY_SELECT.contains("AS \"image\""));
    }
}
