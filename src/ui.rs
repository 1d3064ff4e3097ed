//! TUI rendering for the IP location tracker.
//!
//! This module handles all rendering using the `ratatui` crate: the lookup
//! input bar, the tracked-target list, the world-map canvas with markers and
//! the connecting line, the details cards, and the startup loading screen.

use crate::app::{App, InputMode};
use crate::config::MapConfig;
use crate::geo;
use crate::models::IpRecord;
use ratatui::{
    prelude::*,
    widgets::{canvas::*, *}, // Imports Canvas, Map, Points, etc.
};

use ratatui::text::Line;

/// Renders one frame of the TUI based on current application state.
///
/// While the startup own-location fetch is outstanding, draws the loading
/// screen. Afterwards the layout is fixed: input bar, message line, the
/// list + map row, the two details cards, and the key help.
pub fn render(f: &mut Frame, app: &App) {
    if app.initial_loading {
        render_loading_screen(f, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Input bar
            Constraint::Length(1),  // Error / hint line
            Constraint::Min(8),     // List + map
            Constraint::Length(12), // Details cards
            Constraint::Length(1),  // Key help
        ])
        .split(f.size());

    render_input_bar(f, app, chunks[0]);
    render_message_line(f, app, chunks[1]);

    let map_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(24), Constraint::Percentage(76)])
        .split(chunks[2]);
    render_target_list(f, app, map_row[0]);
    render_map(f, app, map_row[1]);

    let cards_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    render_user_card(f, app, cards_row[0]);
    render_target_card(f, app, cards_row[1]);

    render_help_line(f, app, chunks[4]);
}

/// Startup screen shown until the own-location fetch settles.
fn render_loading_screen(f: &mut Frame, app: &App) {
    let area = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height / 2).saturating_sub(1)),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let title = Paragraph::new(" ipcompass ")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[1]);

    let dots = ".".repeat(app.tick_count / 2 % 4);
    let msg = Paragraph::new(format!("Loading your location{dots}"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(msg, chunks[2]);
}

fn render_input_bar(f: &mut Frame, app: &App, area: Rect) {
    let (title, border_color) = if app.lookup_in_flight {
        (" IP Lookup (searching...) ", Color::Cyan)
    } else if app.input_mode == InputMode::Editing {
        (" IP Lookup ", Color::Yellow)
    } else {
        (" IP Lookup ", Color::DarkGray)
    };

    let content = if app.input.is_empty() && app.input_mode != InputMode::Editing {
        Line::from(Span::styled(
            "Enter IP address (e.g., 49.37.43.161)",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(app.input.as_str())
    };

    let input = Paragraph::new(content).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color)),
    );
    f.render_widget(input, area);

    if app.input_mode == InputMode::Editing && !app.lookup_in_flight {
        // Clamp in usize; the input can be longer than any u16 coordinate.
        let x = (area.x as usize + 1 + app.input.len())
            .min(area.right().saturating_sub(2) as usize) as u16;
        f.set_cursor(x, area.y + 1);
    }
}

/// One line under the input bar: the last error, or the empty-state hint.
fn render_message_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(ref err) = app.error {
        Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red))
    } else if app.targets.is_empty() {
        Paragraph::new(
            "Enter an IP address above to compare locations and see the distance between them",
        )
        .style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new("")
    };
    f.render_widget(line.alignment(Alignment::Center), area);
}

fn render_target_list(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .targets
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let style = if i == app.selected_index {
                Style::default()
                    .fg(Color::Cyan)
                    .bg(Color::Rgb(30, 30, 60))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(marker_color(i))),
                Span::styled(format!("{:<15}", t.ip), style),
                Span::styled(format!(" {}", t.city), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Tracked IPs ({}) ", app.targets.len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(list, area);
}

/// World-map canvas: landmass outlines, the "you" marker, one marker per
/// tracked target, and a dotted line from you to the selected target.
fn render_map(f: &mut Frame, app: &App, area: Rect) {
    let user = app.user.as_ref().map(IpRecord::coords);
    let target = app.selected_target().map(IpRecord::coords);
    let (x_bounds, y_bounds) = map_viewport(user, target, &app.config.map);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(" World Map ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .marker(symbols::Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            // Landmass outlines
            ctx.draw(&Map {
                color: Color::Rgb(60, 60, 60),
                resolution: MapResolution::High,
            });

            // Dotted connection between you and the selected target
            if let (Some(u), Some(t)) = (user, target) {
                let dots = dotted_segment(u, t);
                ctx.draw(&Points {
                    coords: &dots,
                    color: Color::Blue,
                });
            }

            // Target markers; the selected one carries its city label
            for (i, rec) in app.targets.iter().enumerate() {
                if i == app.selected_index {
                    ctx.print(
                        rec.longitude,
                        rec.latitude,
                        Line::from(vec![
                            Span::styled(
                                "●",
                                Style::default()
                                    .fg(marker_color(i))
                                    .add_modifier(Modifier::BOLD),
                            ),
                            Span::styled(
                                format!(" {} ", rec.city),
                                Style::default().fg(Color::Black).bg(marker_color(i)),
                            ),
                        ]),
                    );
                } else {
                    ctx.print(
                        rec.longitude,
                        rec.latitude,
                        Line::from(Span::styled("●", Style::default().fg(marker_color(i)))),
                    );
                }
            }

            // You
            if let Some(ref you) = app.user {
                ctx.print(
                    you.longitude,
                    you.latitude,
                    Line::from(Span::styled(
                        "⌖ You",
                        Style::default()
                            .fg(Color::Blue)
                            .add_modifier(Modifier::BOLD),
                    )),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn render_user_card(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Your Location ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .padding(Padding::new(2, 2, 1, 1));

    let content = match app.user {
        Some(ref you) => record_lines(you),
        None => vec![
            Line::from(Span::styled(
                "Your location could not be determined.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "Lookups still work; distance needs a known starting point.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    };

    let p = Paragraph::new(content).wrap(Wrap { trim: true }).block(block);
    f.render_widget(p, area);
}

fn render_target_card(f: &mut Frame, app: &App, area: Rect) {
    let accent = if app.targets.is_empty() {
        Color::DarkGray
    } else {
        marker_color(app.selected_index)
    };
    let block = Block::default()
        .title(" Target Location ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .padding(Padding::new(2, 2, 1, 1));

    let content = match app.selected_target() {
        Some(target) => {
            let mut lines = record_lines(target);
            if let Some(ref you) = app.user {
                let (ulat, ulon) = you.coords();
                let (tlat, tlon) = target.coords();
                let km = geo::haversine_distance_km(ulat, ulon, tlat, tlon);
                let bearing = geo::initial_bearing_deg(ulat, ulon, tlat, tlon);
                let direction = geo::CompassPoint::from_bearing(bearing);
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled(
                        "Distance from You: ",
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("{km:.2} km"), Style::default().fg(Color::Green)),
                    Span::raw("  |  "),
                    Span::styled("Direction: ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(
                        format!("{} ({:.0}°)", direction, bearing),
                        Style::default().fg(Color::Green),
                    ),
                ]));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "No IPs tracked yet.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let p = Paragraph::new(content).wrap(Wrap { trim: true }).block(block);
    f.render_widget(p, area);
}

/// Label/value lines shared by both details cards.
fn record_lines(rec: &IpRecord) -> Vec<Line<'_>> {
    vec![
        Line::from(vec![
            Span::styled(
                &rec.ip,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {}  {}", rec.kind, rec.flag.emoji)),
        ]),
        Line::from(vec![
            Span::styled("Location: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("{}, {}, {}", rec.city, rec.region, rec.country)),
        ]),
        Line::from(vec![
            Span::styled("Coords:   ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("{:.4}, {:.4}", rec.latitude, rec.longitude)),
            Span::raw("  |  "),
            Span::styled("Postal: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(rec.postal_label()),
        ]),
        Line::from(vec![
            Span::styled("ISP:      ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("{} ({})", rec.connection.isp, rec.connection.org)),
            Span::raw("  |  "),
            Span::styled("ASN: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(rec.connection.asn.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Timezone: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(
                "{} (UTC {})  {}",
                rec.timezone.id,
                rec.timezone.utc,
                rec.timezone.local_time_label()
            )),
        ]),
        Line::from(vec![
            Span::styled("Capital:  ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(&rec.capital),
            Span::raw("  |  "),
            Span::styled("Calling: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("+{}", rec.calling_code)),
        ]),
    ]
}

fn render_help_line(f: &mut Frame, app: &App, area: Rect) {
    let help = match app.input_mode {
        InputMode::Editing => " Enter lookup   Esc list mode   Ctrl+C quit ",
        InputMode::Normal => " i edit   j/k select   J/K reorder   d remove   x clear   q quit ",
    };
    let p = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(p, area);
}

/// Canvas bounds as ([x_min, x_max], [y_min, y_max]), i.e. longitude and
/// latitude ranges.
///
/// Fits both "you" and the selected target with padding when both exist,
/// shows a fixed span around whichever one exists otherwise, and falls back
/// to the configured center when neither is known. Coordinates are taken
/// as-is; points on opposite sides of the antimeridian simply produce a
/// near-global view.
pub fn map_viewport(
    user: Option<(f64, f64)>,
    target: Option<(f64, f64)>,
    map: &MapConfig,
) -> ([f64; 2], [f64; 2]) {
    match (user, target) {
        (Some((ulat, ulon)), Some((tlat, tlon))) => {
            let (lat_min, lat_max) = (ulat.min(tlat), ulat.max(tlat));
            let (lon_min, lon_max) = (ulon.min(tlon), ulon.max(tlon));
            let pad_x = ((lon_max - lon_min) * 0.25).max(5.0);
            let pad_y = ((lat_max - lat_min) * 0.25).max(2.5);
            (
                [lon_min - pad_x, lon_max + pad_x],
                [lat_min - pad_y, lat_max + pad_y],
            )
        }
        (Some((lat, lon)), None) | (None, Some((lat, lon))) => single_view(lat, lon, map),
        (None, None) => single_view(map.fallback_lat, map.fallback_lon, map),
    }
}

fn single_view(lat: f64, lon: f64, map: &MapConfig) -> ([f64; 2], [f64; 2]) {
    // Terminal cells are wider than tall; half the longitude span keeps the
    // view roughly square on screen.
    let span = map.single_span_deg;
    ([lon - span, lon + span], [lat - span / 2.0, lat + span / 2.0])
}

/// Marker color for the target at `index`.
///
/// The first target gets the classic red; later ones cycle through the rest
/// of the palette. Blue is reserved for the "you" marker.
pub fn marker_color(index: usize) -> Color {
    const PALETTE: [Color; 6] = [
        Color::Red,
        Color::Yellow,
        Color::Magenta,
        Color::Green,
        Color::LightRed,
        Color::LightCyan,
    ];
    PALETTE[index % PALETTE.len()]
}

/// Points along the straight segment from `from` to `to` (each (lat, lon)),
/// as (x, y) canvas coordinates, with alternating runs skipped so the
/// connection renders dotted.
fn dotted_segment(from: (f64, f64), to: (f64, f64)) -> Vec<(f64, f64)> {
    const STEPS: usize = 96;
    (0..=STEPS)
        .filter(|i| (i / 4) % 2 == 0)
        .map(|i| {
            let t = i as f64 / STEPS as f64;
            (from.1 + (to.1 - from.1) * t, from.0 + (to.0 - from.0) * t)
        })
        .collect()
}
