//! Save/load round trips through a headless app with `SimulationPlugin` and
//! `SavePlugin`.

use std::fs;
use std::path::PathBuf;

use bevy::prelude::*;
use simulation::engine::HousingMarket;
use simulation::market_config::MarketConfig;
use simulation::policies::{CorporatePolicy, StrPolicy};
use simulation::runner::YearRunner;
use simulation::state_hash::{compute_state_hash, StateHash};
use simulation::stats::MarketStats;
use simulation::SimulationPlugin;

use crate::file_header::unwrap_header;
use crate::save_codec::decompress_payload;
use crate::*;

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin)
        .add_plugins(SavePlugin);
    app
}

fn advance(app: &mut App, years: u32) {
    let world = app.world_mut();
    let policy = world.resource::<MarketConfig>().validate().unwrap();
    let mut market = world.resource_mut::<HousingMarket>();
    for _ in 0..years {
        market.advance_year(&policy).unwrap();
    }
}

fn played_app() -> App {
    let mut app = test_app();
    {
        let mut config = app.world_mut().resource_mut::<MarketConfig>();
        config.corporate_policy = CorporatePolicy::Restrict;
        config.str_policy = StrPolicy::Ban;
        config.turnover_rate_pct = 6.0;
    }
    advance(&mut app, 3);
    app
}

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("housing_market_save_{name}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_save_then_load_restores_market_and_config() {
    let original = played_app();
    let bytes = save_world_to_bytes(original.world()).unwrap();
    assert_eq!(&bytes[..4], b"HSIM");

    let mut restored = test_app();
    advance(&mut restored, 7);
    load_world_from_bytes(restored.world_mut(), &bytes).unwrap();

    let world = restored.world();
    let market = world.resource::<HousingMarket>();
    assert_eq!(market, original.world().resource::<HousingMarket>());
    assert_eq!(
        world.resource::<MarketConfig>(),
        original.world().resource::<MarketConfig>()
    );
    assert_eq!(market.year(), 4);

    // Derived resources are refreshed immediately.
    assert_eq!(world.resource::<MarketStats>().year, 4);
    assert_eq!(
        world.resource::<StateHash>().hash,
        compute_state_hash(market)
    );
}

#[test]
fn test_fresh_market_saves_empty_extension_map() {
    let app = test_app();
    let bytes = save_world_to_bytes(app.world()).unwrap();

    let (header, stored) = unwrap_header(&bytes).unwrap();
    assert!(header.is_compressed());
    let save = SaveData::decode(&decompress_payload(&header, stored).unwrap()).unwrap();
    assert_eq!(save.version, CURRENT_SAVE_VERSION);
    assert!(save.extensions.is_empty());
}

#[test]
fn test_loading_fresh_save_resets_to_defaults() {
    let bytes = save_world_to_bytes(test_app().world()).unwrap();

    let mut app = played_app();
    load_world_from_bytes(app.world_mut(), &bytes).unwrap();
    assert_eq!(
        *app.world().resource::<HousingMarket>(),
        HousingMarket::default()
    );
    assert_eq!(
        *app.world().resource::<MarketConfig>(),
        MarketConfig::default()
    );
}

#[test]
fn test_corrupted_file_leaves_world_untouched() {
    let mut bytes = save_world_to_bytes(played_app().world()).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;

    let mut app = test_app();
    advance(&mut app, 2);
    let before = app.world().resource::<HousingMarket>().clone();

    let err = load_world_from_bytes(app.world_mut(), &bytes).unwrap_err();
    assert!(matches!(err, SaveError::ChecksumMismatch { .. }), "got: {err}");
    assert_eq!(*app.world().resource::<HousingMarket>(), before);
}

#[test]
fn test_load_stops_active_run() {
    let bytes = save_world_to_bytes(played_app().world()).unwrap();
    let mut app = test_app();
    app.world_mut()
        .resource_mut::<YearRunner>()
        .start_run(10)
        .unwrap();

    load_world_from_bytes(app.world_mut(), &bytes).unwrap();
    assert!(!app.world().resource::<YearRunner>().is_running());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = test_dir("missing");
    let mut app = test_app();
    let err = load_world_from_path(app.world_mut(), &dir.join("nope.hsim")).unwrap_err();
    assert!(matches!(err, SaveError::Io(_)));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_events_save_and_load_through_files() {
    let dir = test_dir("events");
    let path = dir.join("slot1.hsim");

    let mut original = played_app();
    original.world_mut().send_event(SaveGameEvent { path: path.clone() });
    original.update();
    assert!(path.exists());
    assert_eq!(
        original.world().resource::<SaveOutcome>().last,
        Some(Ok(path.clone()))
    );

    let mut restored = test_app();
    restored.world_mut().send_event(LoadGameEvent { path: path.clone() });
    restored.update();
    assert_eq!(
        restored.world().resource::<HousingMarket>(),
        original.world().resource::<HousingMarket>()
    );
    assert_eq!(
        restored.world().resource::<SaveOutcome>().last,
        Some(Ok(path))
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_failed_event_load_records_error() {
    let dir = test_dir("event_error");
    let path = dir.join("garbage.hsim");
    fs::write(&path, b"not a save").unwrap();

    let mut app = test_app();
    app.world_mut().send_event(LoadGameEvent { path });
    app.update();
    assert!(matches!(
        app.world().resource::<SaveOutcome>().last,
        Some(Err(_))
    ));

    let _ = fs::remove_dir_all(&dir);
}
