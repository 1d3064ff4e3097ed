//! End-to-end exercise of the tracker flow against canned API bodies.
//!
//! These tests drive the public lib API the way the binary does: parse an
//! API envelope, feed the outcome into the app state, and check what the
//! list, map, and details card derive from it. No network involved.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ipcompass::api::parse_envelope;
use ipcompass::app::App;
use ipcompass::config::Config;
use ipcompass::geo::{self, CompassPoint};
use ipcompass::ui;
use serde_json::{json, Value};

fn body(ip: &str, city: &str, region: &str, country: &str, lat: f64, lon: f64) -> Value {
    json!({
        "ip": ip,
        "success": true,
        "type": "IPv4",
        "country": country,
        "region": region,
        "city": city,
        "latitude": lat,
        "longitude": lon,
        "postal": "1000",
        "calling_code": "44",
        "capital": city,
        "flag": {"emoji": "🏳"},
        "connection": {"asn": 2856, "org": "Example Org", "isp": "Example ISP"},
        "timezone": {
            "id": "Etc/UTC",
            "utc": "+00:00",
            "current_time": "2025-08-26T12:00:00+00:00"
        }
    })
}

fn dhaka_body() -> Value {
    body(
        "103.4.145.1",
        "Dhaka",
        "Dhaka Division",
        "Bangladesh",
        23.8103,
        90.4125,
    )
}

fn london_body() -> Value {
    body(
        "212.58.244.22",
        "London",
        "England",
        "United Kingdom",
        51.5074,
        -0.1278,
    )
}

fn sydney_body() -> Value {
    body(
        "1.1.1.1",
        "Sydney",
        "New South Wales",
        "Australia",
        -33.8688,
        151.2093,
    )
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

/// Types `text` into the input bar, hits Enter, and returns whatever lookup
/// the app asked for.
fn submit(app: &mut App, text: &str) -> Option<String> {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
    press(app, KeyCode::Enter);
    app.take_pending_lookup()
}

#[test]
fn lookup_flow_from_submission_to_card_readout() {
    let mut app = App::new(Config::default());
    assert!(app.initial_loading);

    let you = parse_envelope(dhaka_body()).expect("own-location body parses");
    app.apply_my_location(Some(you));
    assert!(!app.initial_loading);

    let pending = submit(&mut app, "212.58.244.22");
    assert_eq!(pending.as_deref(), Some("212.58.244.22"));
    assert!(app.lookup_in_flight);

    app.apply_lookup(parse_envelope(london_body()));
    assert!(!app.lookup_in_flight);
    assert!(app.error.is_none());
    assert_eq!(app.input, "", "input clears after a successful lookup");
    assert_eq!(app.targets.len(), 1);

    // What the details card derives from the pair of records.
    let you = app.user.clone().expect("own location known");
    let target = app.selected_target().expect("new target selected");
    assert_eq!(target.ip, "212.58.244.22");

    let km = geo::haversine_distance_km(
        you.latitude,
        you.longitude,
        target.latitude,
        target.longitude,
    );
    assert!((km - 8000.0).abs() < 50.0, "Dhaka to London, got {km} km");

    let bearing = geo::initial_bearing_deg(
        you.latitude,
        you.longitude,
        target.latitude,
        target.longitude,
    );
    assert!((0.0..360.0).contains(&bearing));
    assert_eq!(CompassPoint::from_bearing(bearing), CompassPoint::NW);
}

#[test]
fn rejected_lookup_keeps_state_and_shows_the_short_message() {
    let mut app = App::new(Config::default());
    app.apply_my_location(Some(parse_envelope(dhaka_body()).unwrap()));
    app.apply_lookup(parse_envelope(london_body()));

    let pending = submit(&mut app, "999.1.1.1");
    assert!(pending.is_some());
    app.apply_lookup(parse_envelope(json!({
        "success": false,
        "message": "Invalid IP address"
    })));

    assert_eq!(
        app.error.as_deref(),
        Some("Invalid IP address or lookup failed")
    );
    assert_eq!(app.targets.len(), 1, "tracked list survives a failed lookup");
    assert_eq!(app.selected_target().unwrap().ip, "212.58.244.22");
    assert_eq!(app.input, "999.1.1.1", "failed input stays for editing");
    assert!(!app.lookup_in_flight);
}

#[test]
fn duplicate_of_a_tracked_ip_never_reaches_the_network() {
    let mut app = App::new(Config::default());
    app.apply_my_location(Some(parse_envelope(dhaka_body()).unwrap()));
    app.apply_lookup(parse_envelope(london_body()));

    let pending = submit(&mut app, "212.58.244.22");
    assert!(pending.is_none());
    assert_eq!(
        app.error.as_deref(),
        Some("212.58.244.22 is already tracked")
    );
    assert_eq!(app.targets.len(), 1);
}

#[test]
fn startup_failure_still_allows_lookups() {
    let mut app = App::new(Config::default());
    app.apply_my_location(None);
    assert!(app.user.is_none());
    assert!(!app.initial_loading);

    let pending = submit(&mut app, "212.58.244.22");
    assert!(pending.is_some());
    app.apply_lookup(parse_envelope(london_body()));
    assert_eq!(app.targets.len(), 1);

    // Without a known origin the map centers on the lone target.
    let target = app.selected_target().map(|r| r.coords());
    let ([x0, x1], [y0, y1]) = ui::map_viewport(None, target, &app.config.map);
    let (tlat, tlon) = target.unwrap();
    assert!(((x0 + x1) / 2.0 - tlon).abs() < 1e-9);
    assert!(((y0 + y1) / 2.0 - tlat).abs() < 1e-9);
}

#[test]
fn map_viewport_tracks_the_selection() {
    let mut app = App::new(Config::default());
    app.apply_my_location(Some(parse_envelope(dhaka_body()).unwrap()));
    app.apply_lookup(parse_envelope(london_body()));
    app.apply_lookup(parse_envelope(sydney_body()));
    assert_eq!(app.selected_target().unwrap().city, "Sydney");

    // Whatever is selected must fit in the window together with "you".
    for _ in 0..2 {
        let user = app.user.as_ref().map(|r| r.coords());
        let target = app.selected_target().map(|r| r.coords());
        let ([x0, x1], [y0, y1]) = ui::map_viewport(user, target, &app.config.map);

        let (tlat, tlon) = target.unwrap();
        assert!(x0 < tlon && tlon < x1);
        assert!(y0 < tlat && tlat < y1);
        let (ulat, ulon) = user.unwrap();
        assert!(x0 < ulon && ulon < x1);
        assert!(y0 < ulat && ulat < y1);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('j'));
    }
}
