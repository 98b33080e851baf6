use pretty_assertions::assert_eq;
use serde_json::Value;
use serendigo_rs_protocol::{Parking, SuggestionSource};
use serendigo_rs_providers::{events, google, hotpepper};

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(path).expect("fixture")
}

#[test]
fn google_fixture_maps_every_place() {
    let candidates = google::parse_nearby_json(&fixture("google_nearby.json")).expect("parse");
    let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["丸の内ブリックスクエア", "東京駅一番街"]);
    assert_eq!(candidates[0].open_now, Some(false));
    assert_eq!(
        candidates[0].photo_url.as_deref(),
        Some("/places/photo?reference=photo-brick&maxwidth=400")
    );
    assert_eq!(candidates[1].rating, None);
    assert!(
        candidates
            .iter()
            .all(|c| c.source == Some(SuggestionSource::Google) && c.distance_km.is_none())
    );
}

#[test]
fn google_autocomplete_fixture_honours_limit() {
    let predictions =
        google::parse_predictions_json(&fixture("google_autocomplete.json"), 3).expect("parse");
    assert_eq!(predictions.len(), 3);
    assert_eq!(predictions[0].place_id, "ChIJB_vchdMIAWARujTEUIZlr2I");
    assert!(predictions.iter().all(|p| p.description.starts_with("清水")));
}

#[test]
fn google_details_fixture_is_ready_to_save() {
    let details = google::parse_details_json(&fixture("google_details.json"), "ignored")
        .expect("parse")
        .expect("found");
    assert_eq!(details.place_id, "ChIJB_vchdMIAWARujTEUIZlr2I");
    assert_eq!(details.name, "清水寺");
    assert!(details.address.contains("東山区"));
    assert_eq!((details.lat, details.lng), (34.9948561, 135.7850463));
}

#[test]
fn hotpepper_fixture_handles_mixed_coordinate_types() {
    let body: Value = serde_json::from_str(&fixture("hotpepper_gourmet.json")).expect("json");
    let candidates = hotpepper::parse_shops(&body).expect("parse");
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].parking, Some(Parking::Available));
    assert_eq!(candidates[1].parking, Some(Parking::Unknown));
    assert_eq!(candidates[1].lat, 35.679);
    assert_eq!(candidates[1].photo_url, None);
}

#[test]
fn connpass_fixture_drops_online_events() {
    let body: Value = serde_json::from_str(&fixture("connpass_events.json")).expect("json");
    let candidates = events::parse_events(&body);
    let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["千代田区 Rust 勉強会", "もくもく会"]);
    assert_eq!(candidates[1].description.as_deref(), Some("神田会議室"));
}
