//! Address row persistence.

use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::models::{Address, AddressComponents};

/// Fetches an address by id.
pub async fn fetch_address(pool: &SqlitePool, id: i64) -> Result<Option<Address>, DatabaseError> {
    let address = sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(address)
}

/// Fetches an address by its raw text.
pub async fn fetch_address_by_raw(
    pool: &SqlitePool,
    raw: &str,
) -> Result<Option<Address>, DatabaseError> {
    let address = sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE raw = ?")
        .bind(raw)
        .fetch_optional(pool)
        .await?;
    Ok(address)
}

/// Number of stored addresses.
pub async fn count_addresses(pool: &SqlitePool) -> Result<i64, DatabaseError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM addresses")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Writes every column of `address` back to its row in one statement.
pub(crate) async fn save_address(pool: &SqlitePool, address: &Address) -> Result<(), DatabaseError> {
    sqlx::query(
        "UPDATE addresses SET
             street_number = ?, route = ?,
             locality_id = ?,
             sublocality1_id = ?, sublocality2_id = ?, sublocality3_id = ?,
             sublocality4_id = ?, sublocality5_id = ?,
             admin2_id = ?, admin3_id = ?, admin4_id = ?, admin5_id = ?,
             state_id = ?, country_id = ?,
             postal_code_id = ?, postal_code_suffix_id = ?,
             neighborhood_id = ?, airport_id = ?,
             formatted = ?, latitude = ?, longitude = ?,
             intersection = ?, colloquial_area = ?
         WHERE id = ?",
    )
    .bind(&address.street_number)
    .bind(&address.route)
    .bind(address.locality_id)
    .bind(address.sublocality1_id)
    .bind(address.sublocality2_id)
    .bind(address.sublocality3_id)
    .bind(address.sublocality4_id)
    .bind(address.sublocality5_id)
    .bind(address.admin2_id)
    .bind(address.admin3_id)
    .bind(address.admin4_id)
    .bind(address.admin5_id)
    .bind(address.state_id)
    .bind(address.country_id)
    .bind(address.postal_code_id)
    .bind(address.postal_code_suffix_id)
    .bind(address.neighborhood_id)
    .bind(address.airport_id)
    .bind(&address.formatted)
    .bind(address.latitude)
    .bind(address.longitude)
    .bind(&address.intersection)
    .bind(&address.colloquial_area)
    .bind(address.id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Loads an address as a flat component mapping, with the name of every
/// linked hierarchy row filled in. Returns `None` for an unknown id.
pub async fn load_components(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<AddressComponents>, DatabaseError> {
    let row = sqlx::query(
        "SELECT a.raw, a.formatted, a.street_number, a.route, a.latitude, a.longitude,
                a.intersection, a.colloquial_area,
                c.name AS country, c.code AS country_code,
                s.name AS state, s.code AS state_code,
                l.name AS locality,
                sl1.name AS sublocality_level_1, sl2.name AS sublocality_level_2,
                sl3.name AS sublocality_level_3, sl4.name AS sublocality_level_4,
                sl5.name AS sublocality_level_5,
                ad2.name AS admin2, ad3.name AS admin3, ad4.name AS admin4, ad5.name AS admin5,
                pc.code AS postal_code, pcs.suffix AS postal_code_suffix,
                n.name AS neighborhood, ap.name AS airport
         FROM addresses a
         LEFT JOIN countries c ON c.id = a.country_id
         LEFT JOIN states s ON s.id = a.state_id
         LEFT JOIN localities l ON l.id = a.locality_id
         LEFT JOIN sublocalities1 sl1 ON sl1.id = a.sublocality1_id
         LEFT JOIN sublocalities2 sl2 ON sl2.id = a.sublocality2_id
         LEFT JOIN sublocalities3 sl3 ON sl3.id = a.sublocality3_id
         LEFT JOIN sublocalities4 sl4 ON sl4.id = a.sublocality4_id
         LEFT JOIN sublocalities5 sl5 ON sl5.id = a.sublocality5_id
         LEFT JOIN admin2 ad2 ON ad2.id = a.admin2_id
         LEFT JOIN admin3 ad3 ON ad3.id = a.admin3_id
         LEFT JOIN admin4 ad4 ON ad4.id = a.admin4_id
         LEFT JOIN admin5 ad5 ON ad5.id = a.admin5_id
         LEFT JOIN postal_codes pc ON pc.id = a.postal_code_id
         LEFT JOIN postal_code_suffixes pcs ON pcs.id = a.postal_code_suffix_id
         LEFT JOIN neighborhoods n ON n.id = a.neighborhood_id
         LEFT JOIN airports ap ON ap.id = a.airport_id
         WHERE a.id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let name = |column: &str| -> String {
        row.get::<Option<String>, _>(column).unwrap_or_default()
    };

    Ok(Some(AddressComponents {
        raw: row.get("raw"),
        formatted: row.get("formatted"),
        street_number: row.get("street_number"),
        route: row.get("route"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        intersection: row.get("intersection"),
        colloquial_area: row.get("colloquial_area"),
        country: name("country"),
        country_code: name("country_code"),
        state: name("state"),
        state_code: name("state_code"),
        locality: name("locality"),
        sublocality: String::new(),
        sublocality_level_1: name("sublocality_level_1"),
        sublocality_level_2: name("sublocality_level_2"),
        sublocality_level_3: name("sublocality_level_3"),
        sublocality_level_4: name("sublocality_level_4"),
        sublocality_level_5: name("sublocality_level_5"),
        admin2: name("admin2"),
        admin3: name("admin3"),
        admin4: name("admin4"),
        admin5: name("admin5"),
        postal_code: name("postal_code"),
        postal_code_suffix: name("postal_code_suffix"),
        neighborhood: name("neighborhood"),
        airport: name("airport"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::{create_test_pool, insert_address, insert_locality};

    #[tokio::test]
    async fn test_save_address_round_trips_fields() {
        let pool = create_test_pool().await;
        let id = insert_address(&pool, "1 Infinite Loop", None).await;

        let mut address = fetch_address(&pool, id).await.unwrap().expect("address");
        address.route = "Infinite Loop".to_string();
        address.street_number = "1".to_string();
        address.latitude = Some(37.33);
        save_address(&pool, &address).await.expect("save");

        let reloaded = fetch_address(&pool, id).await.unwrap().expect("address");
        assert_eq!(reloaded, address);
    }

    #[tokio::test]
    async fn test_fetch_by_raw() {
        let pool = create_test_pool().await;
        let id = insert_address(&pool, "10 Downing St", None).await;
        let address = fetch_address_by_raw(&pool, "10 Downing St")
            .await
            .unwrap()
            .expect("address");
        assert_eq!(address.id, id);
        assert!(fetch_address_by_raw(&pool, "11 Downing St")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_load_components_names_links() {
        let pool = create_test_pool().await;
        let locality = insert_locality(&pool, "London", None).await;
        let id = insert_address(&pool, "221B Baker St", Some(locality)).await;

        let components = load_components(&pool, id)
            .await
            .unwrap()
            .expect("components");
        assert_eq!(components.raw, "221B Baker St");
        assert_eq!(components.locality, "London");
        assert_eq!(components.state, "");
        assert_eq!(components.latitude, None);
    }

    #[tokio::test]
    async fn test_load_components_unknown_id() {
        let pool = create_test_pool().await;
        assert!(load_components(&pool, 404).await.unwrap().is_none());
        assert_eq!(count_addresses(&pool).await.unwrap(), 0);
    }
}
