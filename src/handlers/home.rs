use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{Home, HomeSummary, PropertyType, UserProfile};
use crate::filter::{HomeFilter, PriceRange};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::home_service::{CreateHomeParams, HomeDetail, UpdateHomeParams};
use crate::AppState;

use super::validate;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHomesQuery {
    pub city: Option<String>,
    pub minimum_price: Option<i64>,
    pub maximum_price: Option<i64>,
    pub property_type: Option<PropertyType>,
}

impl ListHomesQuery {
    /// Shape query parameters into the store filter: price is present only
    /// when at least one bound was supplied.
    fn into_filter(self) -> HomeFilter {
        let price = match (self.minimum_price, self.maximum_price) {
            (None, None) => None,
            (gte, lte) => Some(PriceRange { gte, lte }),
        };
        HomeFilter {
            city: self.city,
            price,
            property_type: self.property_type,
        }
    }
}

/// GET /home - list homes matching the query filters
pub async fn list_homes(
    State(state): State<AppState>,
    Query(query): Query<ListHomesQuery>,
) -> ApiResult<Vec<HomeSummary>> {
    let homes = state.homes.get_homes(&query.into_filter()).await?;
    Ok(ApiResponse::success(homes))
}

/// GET /home/:id - single home with its image gallery
pub async fn get_home(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<HomeDetail> {
    let home = state.homes.get_home_by_id(id).await?;
    Ok(ApiResponse::success(home))
}

/// GET /home/:id/realtor - public profile of the listing's realtor
pub async fn get_realtor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<UserProfile> {
    let realtor = state.homes.get_realtor_by_home_id(id).await?;
    Ok(ApiResponse::success(realtor))
}

/// POST /api/home - create a listing owned by the authenticated realtor
pub async fn create_home(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(params): Json<CreateHomeParams>,
) -> ApiResult<Home> {
    validate_home_params(&params)?;
    let home = state.homes.create_home(params, auth_user.id).await?;
    Ok(ApiResponse::created(home))
}

/// PUT /api/home/:id - update a listing; owner only
pub async fn update_home(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(params): Json<UpdateHomeParams>,
) -> ApiResult<Home> {
    let home = state
        .homes
        .update_home_by_id(id, params, auth_user.id)
        .await?;
    Ok(ApiResponse::success(home))
}

/// DELETE /api/home/:id - delete a listing; owner only
pub async fn delete_home(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Home> {
    let home = state.homes.delete_home_by_id(id, auth_user.id).await?;
    Ok(ApiResponse::success(home))
}

fn validate_home_params(params: &CreateHomeParams) -> Result<(), crate::error::ApiError> {
    validate::collect(vec![
        ("address", validate::non_empty(&params.address, "Address")),
        ("city", validate::non_empty(&params.city, "City")),
        (
            "price",
            if params.price >= 0 {
                Ok(())
            } else {
                Err("Price must not be negative".to_string())
            },
        ),
        (
            "images",
            if params.images.iter().all(|i| !i.url.trim().is_empty()) {
                Ok(())
            } else {
                Err("Image urls cannot be empty".to_string())
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::home_service::ImageUrl;

    #[test]
    fn query_with_city_and_minimum_price_builds_exact_filter() {
        let query = ListHomesQuery {
            city: Some("low-cost".to_string()),
            minimum_price: Some(1_000_000),
            ..Default::default()
        };
        let filter = query.into_filter();
        assert_eq!(
            filter,
            HomeFilter {
                city: Some("low-cost".to_string()),
                price: Some(PriceRange { gte: Some(1_000_000), lte: None }),
                property_type: None,
            }
        );
    }

    #[test]
    fn empty_query_builds_empty_filter() {
        let filter = ListHomesQuery::default().into_filter();
        assert!(filter.is_empty());
        assert!(filter.price.is_none());
    }

    #[test]
    fn query_params_deserialize_external_names() {
        let query: ListHomesQuery =
            serde_json::from_str(r#"{"city":"Keffi","minimumPrice":1000000,"propertyType":"CONDO"}"#)
                .unwrap();
        assert_eq!(query.minimum_price, Some(1_000_000));
        assert_eq!(query.property_type, Some(PropertyType::Condo));
    }

    #[test]
    fn rejects_negative_price_and_blank_image_urls() {
        let params = CreateHomeParams {
            address: "low-cost".to_string(),
            city: "Keffi".to_string(),
            price: -1,
            property_type: PropertyType::Condo,
            number_of_bedrooms: 6,
            number_of_bathrooms: 4,
            land_size: 3346,
            images: vec![ImageUrl { url: "  ".to_string() }],
        };
        let err = validate_home_params(&params).unwrap_err();
        let body = err.to_json();
        assert!(body["field_errors"].get("price").is_some());
        assert!(body["field_errors"].get("images").is_some());
    }
}
