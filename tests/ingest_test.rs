//! Integration tests for journal ingestion: each test drives decoded records
//! through the batch driver against a temp-file database and checks the
//! stored state.

use serde_json::{json, Value};
use std::io::Cursor;
use tempfile::NamedTempFile;

use ed_journal_to_sqlite::journal::{ingest_lines, BatchStats};
use ed_journal_to_sqlite::market::{ingest_market_snapshot, MarketSnapshot};
use ed_journal_to_sqlite::store::IngestContext;

// =============================================================================
// Helpers
// =============================================================================

fn test_ctx() -> (IngestContext, NamedTempFile) {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    let ctx = IngestContext::open(temp.path()).expect("Failed to open database");
    (ctx, temp)
}

fn ingest(ctx: &mut IngestContext, lines: &[&str]) -> BatchStats {
    ingest_lines(ctx, Cursor::new(lines.join("\n"))).expect("ingest failed")
}

fn count(ctx: &IngestContext, table: &str) -> i64 {
    ctx.connection()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}

fn detail_of(ctx: &IngestContext, sql: &str) -> Value {
    let text: String = ctx.connection().query_row(sql, [], |r| r.get(0)).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn fsdjump_line() -> String {
    json!({
        "timestamp": "2024-05-01T12:00:00Z",
        "event": "FSDJump",
        "StarSystem": "LHS 3447",
        "SystemAddress": 5306465653474i64,
        "StarPos": [-43.1875, -5.28125, 56.15625],
        "SystemAllegiance": "Federation",
        "SystemEconomy_Localised": "Industrial",
        "SystemSecondEconomy_Localised": "Refinery",
        "SystemGovernment_Localised": "Democracy",
        "SystemSecurity_Localised": "Medium Security",
        "Population": 6748688419i64,
        "Body": "LHS 3447 A",
        "BodyID": 1,
        "BodyType": "Star",
        "JumpDist": 10.064,
        "SystemFaction": {"Name": "LHS 3447 Alliance", "FactionState": "Boom"},
        "Factions": [
            {
                "Name": "LHS 3447 Alliance",
                "FactionState": "Boom",
                "Government": "Democracy",
                "Influence": 0.49,
                "Allegiance": "Federation",
                "Happiness": "$Faction_HappinessBand2;",
                "Happiness_Localised": "Happy",
                "MyReputation": 15.0,
                "ActiveStates": [{"State": "Boom"}]
            },
            {
                "Name": "Natural LHS 3447 Defence Party",
                "FactionState": "None",
                "Government": "Dictatorship",
                "Influence": 0.06,
                "Allegiance": "Independent",
                "Happiness_Localised": "Happy",
                "MyReputation": 0.0
            }
        ]
    })
    .to_string()
}

fn snapshot(items: Value) -> MarketSnapshot {
    serde_json::from_value(json!({
        "MarketID": 128049552i64,
        "timestamp": "2024-05-01T12:30:00Z",
        "Items": items
    }))
    .unwrap()
}

fn gold_item(buy: i64, sell: i64, stock: i64) -> Value {
    json!({
        "id": 128049202,
        "Name": "$gold_name;",
        "Name_Localised": "Gold",
        "Category": "$MARKET_category_metals;",
        "Category_Localised": "Metals",
        "BuyPrice": buy,
        "SellPrice": sell,
        "StockBracket": 3,
        "DemandBracket": 0,
        "Stock": stock,
        "Demand": 1,
        "Rare": false
    })
}

// =============================================================================
// Compound events and reference resolution
// =============================================================================

#[test]
fn test_fsdjump_creates_all_entities() {
    let (mut ctx, _db) = test_ctx();
    ingest(&mut ctx, &[&fsdjump_line()]);

    assert_eq!(count(&ctx, "system_tbl"), 1);
    assert_eq!(count(&ctx, "body_tbl"), 1);
    assert_eq!(count(&ctx, "faction_tbl"), 2);
    assert_eq!(count(&ctx, "system_faction_tbl"), 2);

    let (name, posx, population, arrived): (String, f64, i64, Option<String>) = ctx
        .connection()
        .query_row(
            "SELECT name, posx, population, lastarrived_at FROM system_tbl WHERE id = 5306465653474",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .unwrap();
    assert_eq!(name, "LHS 3447");
    assert!((posx + 43.1875).abs() < 1e-9);
    assert_eq!(population, 6748688419);
    assert_eq!(arrived.as_deref(), Some("2024-05-01T12:00:00Z"));
}

#[test]
fn test_controlling_faction_resolves_to_identifier() {
    let (mut ctx, _db) = test_ctx();

    // First sighting: the system update runs before the faction rows exist,
    // so the controlling-faction reference is left unset.
    ingest(&mut ctx, &[&fsdjump_line()]);
    let stored: Option<i64> = ctx
        .connection()
        .query_row(
            "SELECT systemfaction_id FROM system_tbl WHERE id = 5306465653474",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(stored, None);

    // With the faction now stored, a repeat arrival resolves the reference
    // to its identifier, not its name.
    ingest(&mut ctx, &[&fsdjump_line()]);
    let expected: i64 = ctx
        .connection()
        .query_row(
            "SELECT id FROM faction_tbl WHERE name = 'LHS 3447 Alliance'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    let stored: Option<i64> = ctx
        .connection()
        .query_row(
            "SELECT systemfaction_id FROM system_tbl WHERE id = 5306465653474",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(stored, Some(expected));
}

#[test]
fn test_system_faction_references_resolve_within_one_unit() {
    // The factions were unknown before this batch; creation must precede
    // the system-faction rows that reference them by name.
    let (mut ctx, _db) = test_ctx();
    ingest(&mut ctx, &[&fsdjump_line()]);

    let influence: f64 = ctx
        .connection()
        .query_row(
            "SELECT sf.influence FROM system_faction_tbl sf \
             JOIN faction_tbl f ON f.id = sf.faction_id \
             WHERE f.name = 'LHS 3447 Alliance'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert!((influence - 0.49).abs() < 1e-9);

    let state = detail_of(
        &ctx,
        "SELECT json(sf.state) FROM system_faction_tbl sf \
         JOIN faction_tbl f ON f.id = sf.faction_id \
         WHERE f.name = 'LHS 3447 Alliance'",
    );
    assert_eq!(state["ActiveStates"][0]["State"], "Boom");
}

#[test]
fn test_unresolved_reference_left_unset() {
    let (mut ctx, _db) = test_ctx();
    let docked = json!({
        "timestamp": "2024-05-01T13:00:00Z",
        "event": "Docked",
        "StationName": "Yaping Enterprise",
        "StationType": "Orbis",
        "MarketID": 3223343616i64,
        "SystemAddress": 5306465653474i64,
        "StationFaction": {"Name": "Never Stored Faction"},
        "DistFromStarLS": 325.2
    })
    .to_string();
    ingest(&mut ctx, &[&docked]);

    let (name, faction_id): (String, Option<i64>) = ctx
        .connection()
        .query_row(
            "SELECT name, stationfaction_id FROM market_tbl WHERE id = 3223343616",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(name, "Yaping Enterprise");
    assert_eq!(faction_id, None);
}

// =============================================================================
// Idempotence and in-place merge
// =============================================================================

#[test]
fn test_reapplying_record_is_idempotent() {
    let (mut ctx, _db) = test_ctx();
    let line = fsdjump_line();
    ingest(&mut ctx, &[&line]);
    let detail_before = detail_of(&ctx, "SELECT json(detail) FROM system_tbl");

    ingest(&mut ctx, &[&line]);
    assert_eq!(count(&ctx, "system_tbl"), 1);
    assert_eq!(count(&ctx, "body_tbl"), 1);
    assert_eq!(count(&ctx, "faction_tbl"), 2);
    assert_eq!(count(&ctx, "system_faction_tbl"), 2);
    assert_eq!(
        detail_of(&ctx, "SELECT json(detail) FROM system_tbl"),
        detail_before
    );
}

#[test]
fn test_same_key_updates_in_place() {
    let (mut ctx, _db) = test_ctx();
    let first = json!({
        "timestamp": "2024-05-01T13:00:00Z",
        "event": "Docked",
        "StationName": "Old Name",
        "MarketID": 99,
        "SystemAddress": 1
    })
    .to_string();
    let second = json!({
        "timestamp": "2024-05-02T13:00:00Z",
        "event": "Docked",
        "StationName": "New Name",
        "MarketID": 99,
        "SystemAddress": 1
    })
    .to_string();
    ingest(&mut ctx, &[&first, &second]);

    assert_eq!(count(&ctx, "market_tbl"), 1);
    let (name, updated): (String, String) = ctx
        .connection()
        .query_row(
            "SELECT name, updated_at FROM market_tbl WHERE id = 99",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(name, "New Name");
    assert_eq!(updated, "2024-05-02T13:00:00Z");
}

fn scan_line(radius: Option<f64>, terraform: Option<&str>) -> String {
    let mut record = json!({
        "timestamp": "2024-05-01T14:00:00Z",
        "event": "Scan",
        "ScanType": "Detailed",
        "SystemAddress": 77,
        "BodyID": 4,
        "BodyName": "Test Body"
    });
    if let Some(radius) = radius {
        record["Radius"] = json!(radius);
    }
    if let Some(state) = terraform {
        record["TerraformState"] = json!(state);
    }
    record.to_string()
}

#[test]
fn test_detail_bag_merge_patch_laws() {
    let (mut ctx, _db) = test_ctx();

    // disjoint keys union
    ingest(&mut ctx, &[&scan_line(Some(1000.0), None)]);
    ingest(&mut ctx, &[&scan_line(None, Some("Terraformable"))]);
    let detail = detail_of(&ctx, "SELECT json(detail) FROM body_tbl WHERE body_id = 4");
    assert_eq!(detail["Radius"], json!(1000.0));
    assert_eq!(detail["TerraformState"], "Terraformable");

    // new scalar wins, no accumulation
    ingest(&mut ctx, &[&scan_line(Some(2000.0), None)]);
    let detail = detail_of(&ctx, "SELECT json(detail) FROM body_tbl WHERE body_id = 4");
    assert_eq!(detail["Radius"], json!(2000.0));
    assert_eq!(detail["TerraformState"], "Terraformable");

    // a record with no detail payload leaves the bag untouched
    let bare = json!({
        "timestamp": "2024-05-01T15:00:00Z",
        "event": "SupercruiseExit",
        "SystemAddress": 77,
        "BodyID": 4,
        "Body": "Test Body"
    })
    .to_string();
    ingest(&mut ctx, &[&bare]);
    let after = detail_of(&ctx, "SELECT json(detail) FROM body_tbl WHERE body_id = 4");
    assert_eq!(after, detail);
}

// =============================================================================
// Market snapshots
// =============================================================================

#[test]
fn test_price_rows_fully_replaced() {
    let (mut ctx, _db) = test_ctx();
    ingest_market_snapshot(&mut ctx, &snapshot(json!([gold_item(9401, 9400, 1766)]))).unwrap();
    ingest_market_snapshot(&mut ctx, &snapshot(json!([{
        "Name": "$gold_name;",
        "Name_Localised": "Gold",
        "Category_Localised": "Metals",
        "BuyPrice": 9000,
        "SellPrice": 8999,
        "Rare": false
    }])))
    .unwrap();

    assert_eq!(count(&ctx, "market_price_tbl"), 1);
    let (buy, stock): (i64, Option<i64>) = ctx
        .connection()
        .query_row(
            "SELECT buyprice, stock FROM market_price_tbl",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(buy, 9000);
    // full replacement: the old stock value does not linger
    assert_eq!(stock, None);
}

#[test]
fn test_commodity_first_sighting_wins() {
    let (mut ctx, _db) = test_ctx();
    let stats =
        ingest_market_snapshot(&mut ctx, &snapshot(json!([gold_item(9401, 9400, 1766)]))).unwrap();
    assert_eq!(stats.commodities, 1);

    let second = snapshot(json!([{
        "Name_Localised": "Gold",
        "Category_Localised": "Renamed Category",
        "BuyPrice": 1,
        "SellPrice": 2,
        "Rare": true
    }]));
    let stats = ingest_market_snapshot(&mut ctx, &second).unwrap();
    assert_eq!(stats.commodities, 0);

    let category: String = ctx
        .connection()
        .query_row(
            "SELECT category FROM commodity_tbl WHERE name = 'Gold'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(category, "Metals");
}

#[test]
fn test_prices_resolve_through_rebuilt_cache() {
    let (mut ctx, _db) = test_ctx();
    ingest_market_snapshot(&mut ctx, &snapshot(json!([gold_item(9401, 9400, 1766)]))).unwrap();

    let commodity_id: i64 = ctx
        .connection()
        .query_row("SELECT id FROM commodity_tbl WHERE name = 'Gold'", [], |r| {
            r.get(0)
        })
        .unwrap();
    let priced: i64 = ctx
        .connection()
        .query_row(
            "SELECT commodity_id FROM market_price_tbl WHERE market_id = 128049552",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(priced, commodity_id);
    assert_eq!(ctx.commodities().id_of("Gold"), Some(commodity_id));
    assert_eq!(
        ctx.commodities().name_of(commodity_id),
        Some("Gold")
    );
}

// =============================================================================
// Batch behavior
// =============================================================================

#[test]
fn test_decode_failure_does_not_interrupt_batch() {
    let (mut ctx, _db) = test_ctx();
    let good = |id: i64| {
        json!({
            "timestamp": "2024-05-01T12:00:00Z",
            "event": "Docked",
            "StationName": format!("Station {}", id),
            "MarketID": id
        })
        .to_string()
    };

    let lines = [
        good(1),
        good(2),
        "{ this is not json".to_string(),
        good(3),
        good(4),
    ];
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let stats = ingest(&mut ctx, &refs);

    assert_eq!(stats.lines, 5);
    assert_eq!(stats.decode_failures, 1);
    assert_eq!(stats.applied, 4);
    assert_eq!(count(&ctx, "market_tbl"), 4);
}

#[test]
fn test_statistics_snapshots_merge_by_timestamp() {
    let (mut ctx, _db) = test_ctx();
    let first = json!({
        "timestamp": "2024-05-01T12:00:00Z",
        "event": "Statistics",
        "Bank_Account": {"Current_Wealth": 1000}
    })
    .to_string();
    let same_moment = json!({
        "timestamp": "2024-05-01T12:00:00Z",
        "event": "Statistics",
        "Combat": {"Bounties_Claimed": 3}
    })
    .to_string();
    let later = json!({
        "timestamp": "2024-05-02T12:00:00Z",
        "event": "Statistics",
        "Bank_Account": {"Current_Wealth": 2000}
    })
    .to_string();
    ingest(&mut ctx, &[&first, &same_moment, &later]);

    assert_eq!(count(&ctx, "statistics_tbl"), 2);
    let merged = detail_of(
        &ctx,
        "SELECT json(detail) FROM statistics_tbl WHERE updated_at = '2024-05-01T12:00:00Z'",
    );
    assert_eq!(merged["Bank_Account"]["Current_Wealth"], 1000);
    assert_eq!(merged["Combat"]["Bounties_Claimed"], 3);
}

#[test]
fn test_missing_key_skips_update_without_error() {
    let (mut ctx, _db) = test_ctx();
    // Location while not docked: no MarketID, so no market row.
    let location = json!({
        "timestamp": "2024-05-01T12:00:00Z",
        "event": "Location",
        "StarSystem": "LHS 3447",
        "SystemAddress": 5306465653474i64
    })
    .to_string();
    let stats = ingest(&mut ctx, &[&location]);
    assert_eq!(stats.applied, 0);
    assert_eq!(stats.decode_failures, 0);
    assert_eq!(count(&ctx, "market_tbl"), 0);
}
