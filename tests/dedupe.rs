// Locality deduplication against legacy duplicate rows.

mod helpers;

use geo_address::{
    count_nodes, dedupe_localities, fetch_address, to_address, AddressInput, DedupeReport, Level,
};
use helpers::{
    create_test_pool, drop_locality_unique_index, insert_address, insert_locality,
    insert_locality_with_id, locality_of, springfield_payload,
};
use sqlx::SqlitePool;

async fn insert_illinois(pool: &SqlitePool) -> i64 {
    let country: i64 =
        sqlx::query_scalar("INSERT INTO countries (name, code) VALUES (?, ?) RETURNING id")
            .bind("United States")
            .bind("US")
            .fetch_one(pool)
            .await
            .expect("Failed to insert country");
    sqlx::query_scalar("INSERT INTO states (name, code, country_id) VALUES (?, ?, ?) RETURNING id")
        .bind("Illinois")
        .bind("IL")
        .bind(country)
        .fetch_one(pool)
        .await
        .expect("Failed to insert state")
}

#[tokio::test]
async fn test_scenario_e_address_moves_to_lowest_id() {
    let pool = create_test_pool().await;
    drop_locality_unique_index(&pool).await;
    let illinois = insert_illinois(&pool).await;
    insert_locality_with_id(&pool, 5, "Springfield", Some(illinois)).await;
    insert_locality_with_id(&pool, 9, "Springfield", Some(illinois)).await;
    let address = insert_address(&pool, "100 Main St", Some(9)).await;

    let report = dedupe_localities(&pool).await.expect("dedupe");
    assert_eq!(
        report,
        DedupeReport {
            addresses_scanned: 1,
            addresses_repointed: 1,
            localities_deleted: 1,
        }
    );

    assert_eq!(locality_of(&pool, address).await, Some(5));
    let remaining: Vec<i64> = sqlx::query_scalar("SELECT id FROM localities ORDER BY id")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, vec![5]);
}

#[tokio::test]
async fn test_every_referencing_address_is_kept() {
    let pool = create_test_pool().await;
    drop_locality_unique_index(&pool).await;
    let illinois = insert_illinois(&pool).await;
    let ids = [
        insert_locality(&pool, "Springfield", Some(illinois)).await,
        insert_locality(&pool, "Springfield", Some(illinois)).await,
        insert_locality(&pool, "Springfield", Some(illinois)).await,
    ];
    let mut addresses = Vec::new();
    for (i, locality) in ids.iter().cycle().take(7).enumerate() {
        addresses.push(insert_address(&pool, &format!("{} Main St", i + 1), Some(*locality)).await);
    }

    let report = dedupe_localities(&pool).await.expect("dedupe");
    assert_eq!(report.addresses_scanned, 7);
    assert_eq!(report.localities_deleted, 2);

    for address in addresses {
        assert_eq!(locality_of(&pool, address).await, Some(ids[0]));
    }
    assert_eq!(count_nodes(&pool, Level::Locality).await.unwrap(), 1);
}

#[tokio::test]
async fn test_groups_are_kept_apart() {
    let pool = create_test_pool().await;
    drop_locality_unique_index(&pool).await;
    let illinois = insert_illinois(&pool).await;
    let il_first = insert_locality(&pool, "Springfield", Some(illinois)).await;
    let il_second = insert_locality(&pool, "Springfield", Some(illinois)).await;
    let stateless = insert_locality(&pool, "Springfield", None).await;
    let chicago = insert_locality(&pool, "Chicago", Some(illinois)).await;

    let a = insert_address(&pool, "1 Main St", Some(il_second)).await;
    let b = insert_address(&pool, "2 Main St", Some(stateless)).await;
    let c = insert_address(&pool, "3 State St", Some(chicago)).await;

    dedupe_localities(&pool).await.expect("dedupe");

    assert_eq!(locality_of(&pool, a).await, Some(il_first));
    assert_eq!(locality_of(&pool, b).await, Some(stateless));
    assert_eq!(locality_of(&pool, c).await, Some(chicago));
    assert_eq!(count_nodes(&pool, Level::Locality).await.unwrap(), 3);
}

#[tokio::test]
async fn test_rerun_converges_to_nothing() {
    let pool = create_test_pool().await;
    drop_locality_unique_index(&pool).await;
    let first = insert_locality(&pool, "London", None).await;
    let second = insert_locality(&pool, "London", None).await;
    insert_address(&pool, "221B Baker St", Some(second)).await;
    insert_address(&pool, "10 Downing St", Some(first)).await;

    let first_pass = dedupe_localities(&pool).await.expect("first pass");
    assert_eq!(first_pass.localities_deleted, 1);

    let second_pass = dedupe_localities(&pool).await.expect("second pass");
    assert_eq!(second_pass.addresses_scanned, 2);
    assert_eq!(second_pass.addresses_repointed, 0);
    assert_eq!(second_pass.localities_deleted, 0);
}

#[tokio::test]
async fn test_normalizer_reuses_surviving_locality() {
    let pool = create_test_pool().await;
    let address = to_address(&pool, AddressInput::Components(springfield_payload()))
        .await
        .expect("normalize")
        .expect("address");
    let locality = address.record().and_then(|a| a.locality_id);

    let report = dedupe_localities(&pool).await.expect("dedupe");
    assert_eq!(report.localities_deleted, 0);

    let other = to_address(
        &pool,
        AddressInput::Components(geo_address::AddressComponents {
            raw: "200 Main St, Springfield, IL 62701".to_string(),
            ..springfield_payload()
        }),
    )
    .await
    .expect("normalize")
    .expect("address");
    let other = fetch_address(&pool, other.id())
        .await
        .expect("fetch")
        .expect("address");
    assert_eq!(other.locality_id, locality);
}

#[tokio::test]
async fn test_merged_sublocalities_are_reused_by_normalizer() {
    let pool = create_test_pool().await;
    let brooklyn = geo_address::AddressComponents {
        raw: "Atlantic Ave, Brooklyn".to_string(),
        locality: "New York".to_string(),
        state: String::new(),
        state_code: String::new(),
        sublocality_level_1: "Brooklyn".to_string(),
        ..springfield_payload()
    };
    let canonical = to_address(&pool, AddressInput::Components(brooklyn.clone()))
        .await
        .expect("normalize")
        .expect("address");
    let canonical = fetch_address(&pool, canonical.id())
        .await
        .expect("fetch")
        .expect("address");

    drop_locality_unique_index(&pool).await;
    let dup = insert_locality(&pool, "New York", None).await;
    let dup_brooklyn: i64 = sqlx::query_scalar(
        "INSERT INTO sublocalities1 (name, locality_id) VALUES ('Brooklyn', ?) RETURNING id",
    )
    .bind(dup)
    .fetch_one(&pool)
    .await
    .unwrap();
    let flatbush: i64 = sqlx::query_scalar(
        "INSERT INTO sublocalities2 (name, parent_id) VALUES ('Flatbush', ?) RETURNING id",
    )
    .bind(dup_brooklyn)
    .fetch_one(&pool)
    .await
    .unwrap();
    let legacy = insert_address(&pool, "Flatbush Ave, Brooklyn", Some(dup)).await;
    sqlx::query("UPDATE addresses SET sublocality1_id = ?, sublocality2_id = ? WHERE id = ?")
        .bind(dup_brooklyn)
        .bind(flatbush)
        .bind(legacy)
        .execute(&pool)
        .await
        .unwrap();

    let report = dedupe_localities(&pool).await.expect("dedupe");
    assert_eq!(report.localities_deleted, 1);

    let legacy = fetch_address(&pool, legacy)
        .await
        .expect("fetch")
        .expect("address");
    assert_eq!(legacy.locality_id, canonical.locality_id);
    assert_eq!(legacy.sublocality1_id, canonical.sublocality1_id);
    assert_eq!(legacy.sublocality2_id, Some(flatbush));

    let fresh = to_address(
        &pool,
        AddressInput::Components(geo_address::AddressComponents {
            raw: "Church Ave, Brooklyn".to_string(),
            sublocality_level_2: "Flatbush".to_string(),
            ..brooklyn
        }),
    )
    .await
    .expect("normalize")
    .expect("address");
    let fresh = fetch_address(&pool, fresh.id())
        .await
        .expect("fetch")
        .expect("address");
    assert_eq!(fresh.sublocality2_id, Some(flatbush));
    assert_eq!(count_nodes(&pool, Level::SubLocality2).await.unwrap(), 1);
}
