//! Askama templates for the web frontend.

use std::collections::HashMap;

use askama::Template;

use crate::domain::{Station, StationId};
use crate::probe::StationOverview;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Dashboard page. The station list itself is a fragment the page polls.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// Station detail page.
#[derive(Template)]
#[template(path = "station_detail.html")]
pub struct StationDetailTemplate {
    pub station: StationDetailView,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Station list fragment.
#[derive(Template)]
#[template(path = "station_list.html")]
pub struct StationListTemplate {
    pub view: StationListView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// View model for the station list fragment.
///
/// A pure function of externally observed state (connection phase, station
/// snapshot, retry countdown), rebuilt on every render. Exactly one of the
/// four visual regions is active at a time: error panel, loading indicator,
/// empty message, or the populated list. The error branch takes precedence
/// over everything else.
#[derive(Debug, Clone)]
pub struct StationListView {
    pub is_loading: bool,
    pub has_error: bool,
    pub station_count: usize,
    pub rows: Vec<StationRowView>,
    countdown: Option<u32>,
}

impl StationListView {
    /// Build the view from a station snapshot and the observed feed state.
    ///
    /// `countdown` is the latest value of the retry countdown stream, or
    /// `None` if nothing has been emitted yet.
    pub fn build(
        is_loading: bool,
        has_error: bool,
        stations: &HashMap<StationId, Station>,
        countdown: Option<u32>,
    ) -> Self {
        let rows = sorted_by_label(stations)
            .into_iter()
            .map(StationRowView::from_station)
            .collect();

        Self {
            is_loading,
            has_error,
            station_count: stations.len(),
            rows,
            countdown,
        }
    }

    /// Whether any station is known.
    pub fn any_station_found(&self) -> bool {
        self.station_count > 0
    }

    /// Whether the "no stations found" line is shown.
    pub fn show_empty_message(&self) -> bool {
        !self.is_loading && !self.any_station_found()
    }

    /// Whether the station-count line is shown.
    pub fn show_count_message(&self) -> bool {
        !self.is_loading && self.any_station_found()
    }

    /// Whether the "Refresh station list" action is shown.
    pub fn show_refresh(&self) -> bool {
        !self.is_loading
    }

    /// Whether the station rows are shown.
    pub fn show_list(&self) -> bool {
        !self.is_loading && self.any_station_found()
    }

    /// The station-count line, singular for exactly one station.
    pub fn count_message(&self) -> String {
        if self.station_count == 1 {
            "Found 1 station.".to_string()
        } else {
            format!("Found {} stations.", self.station_count)
        }
    }

    /// The retry countdown line for the error panel.
    ///
    /// Shows the latest emitted value; falls back to the literal
    /// "Retrying in…" when the stream has not emitted anything yet.
    pub fn countdown_text(&self) -> String {
        match self.countdown {
            Some(secs) => format!("Retrying in {secs}s."),
            None => "Retrying in…".to_string(),
        }
    }
}

/// One row of the station list.
#[derive(Debug, Clone)]
pub struct StationRowView {
    pub id: String,
    pub label: String,
    pub status_text: &'static str,
    pub reachable: bool,
    pub host_port: String,
    pub test_description: Option<String>,
}

impl StationRowView {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.as_str().to_string(),
            label: station.label.clone(),
            status_text: station.status.display_text(),
            reachable: station.is_reachable(),
            host_port: station.address(),
            test_description: station.test_description.clone(),
        }
    }

    /// CSS classes for the row; unreachable stations get a marker class.
    pub fn row_class(&self) -> &'static str {
        if self.reachable {
            "station-row"
        } else {
            "station-row station-unreachable"
        }
    }
}

/// Station detail view model.
#[derive(Debug, Clone)]
pub struct StationDetailView {
    pub id: String,
    pub label: String,
    pub status_text: &'static str,
    pub reachable: bool,
    pub host_port: String,
    pub test_description: Option<String>,
    pub last_seen: String,
    pub software_version: Option<String>,
    pub running_test_name: Option<String>,
    pub running_test_description: Option<String>,
}

impl StationDetailView {
    /// Create from a domain Station plus an optional probed overview.
    pub fn from_parts(station: &Station, overview: Option<&StationOverview>) -> Self {
        let running_test = overview.and_then(|o| o.running_test.as_ref());

        Self {
            id: station.id.as_str().to_string(),
            label: station.label.clone(),
            status_text: station.status.display_text(),
            reachable: station.is_reachable(),
            host_port: station.address(),
            test_description: station.test_description.clone(),
            last_seen: station
                .last_seen
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            software_version: overview.and_then(|o| o.software_version.clone()),
            running_test_name: running_test.map(|t| t.name.clone()),
            running_test_description: running_test.and_then(|t| t.description.clone()),
        }
    }
}

/// Stations in render order: ascending by `label`, deterministic on ties.
///
/// The backing map is unordered, so equal labels fall back to the station
/// id, the collection's only stable notion of identity. An empty collection
/// yields an empty sequence.
pub fn sorted_by_label(stations: &HashMap<StationId, Station>) -> Vec<&Station> {
    let mut values: Vec<&Station> = stations.values().collect();
    values.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationStatus;
    use chrono::Utc;

    fn station(id: &str, label: &str, status: StationStatus, host: &str, port: u16) -> Station {
        Station {
            id: StationId::parse(id).unwrap(),
            label: label.to_string(),
            status,
            host: host.to_string(),
            port,
            test_description: None,
            last_seen: Utc::now(),
        }
    }

    fn collection(stations: Vec<Station>) -> HashMap<StationId, Station> {
        stations.into_iter().map(|s| (s.id.clone(), s)).collect()
    }

    /// The four visual regions: exactly one must be active for any input.
    fn active_regions(view: &StationListView) -> Vec<&'static str> {
        let mut regions = Vec::new();
        if view.has_error {
            regions.push("error");
        } else if view.is_loading {
            regions.push("loading");
        } else if view.any_station_found() {
            regions.push("list");
        } else {
            regions.push("empty");
        }
        regions
    }

    #[test]
    fn loading_shows_only_the_indicator() {
        // Scenario A
        let view = StationListView::build(true, false, &HashMap::new(), None);

        assert!(!view.show_empty_message());
        assert!(!view.show_count_message());
        assert!(!view.show_refresh());
        assert!(!view.show_list());
        assert_eq!(active_regions(&view), vec!["loading"]);
    }

    #[test]
    fn loading_suppresses_messages_even_with_stations() {
        let stations = collection(vec![station(
            "s1",
            "Alpha",
            StationStatus::Online,
            "10.0.0.1",
            80,
        )]);
        let view = StationListView::build(true, false, &stations, None);

        assert!(!view.show_count_message());
        assert!(!view.show_refresh());
        assert!(!view.show_list());
    }

    #[test]
    fn empty_state_message_when_connected_and_no_stations() {
        // Scenario B
        let view = StationListView::build(false, false, &HashMap::new(), None);

        assert!(view.show_empty_message());
        assert!(!view.show_count_message());
        assert!(view.show_refresh());
        assert!(!view.show_list());
        assert_eq!(active_regions(&view), vec!["empty"]);
    }

    #[test]
    fn single_station_uses_singular_count() {
        // Scenario C
        let stations = collection(vec![station(
            "a",
            "Alpha",
            StationStatus::Online,
            "10.0.0.1",
            80,
        )]);
        let view = StationListView::build(false, false, &stations, None);

        assert_eq!(view.count_message(), "Found 1 station.");
        assert!(view.show_list());

        let row = &view.rows[0];
        assert_eq!(row.label, "Alpha");
        assert_eq!(row.status_text, "Online");
        assert_eq!(row.host_port, "10.0.0.1:80");
        assert!(row.reachable);
    }

    #[test]
    fn multiple_stations_use_plural_count() {
        let stations = collection(vec![
            station("a", "Alpha", StationStatus::Online, "10.0.0.1", 80),
            station("b", "Beta", StationStatus::Online, "10.0.0.2", 80),
        ]);
        let view = StationListView::build(false, false, &stations, None);

        assert_eq!(view.count_message(), "Found 2 stations.");
    }

    #[test]
    fn zero_count_is_plural() {
        // The empty branch suppresses this message, but the wording must
        // still be plural if asked.
        let view = StationListView::build(false, false, &HashMap::new(), None);
        assert_eq!(view.count_message(), "Found 0 stations.");
    }

    #[test]
    fn error_takes_precedence_over_loading_and_list() {
        // Scenario D, plus the both-flags-set edge
        let stations = collection(vec![station(
            "a",
            "Alpha",
            StationStatus::Online,
            "10.0.0.1",
            80,
        )]);

        for loading in [false, true] {
            let view = StationListView::build(loading, true, &stations, None);
            assert_eq!(active_regions(&view), vec!["error"]);
        }
    }

    #[test]
    fn countdown_fallback_before_first_emission() {
        let view = StationListView::build(false, true, &HashMap::new(), None);
        assert_eq!(view.countdown_text(), "Retrying in…");
    }

    #[test]
    fn countdown_reflects_latest_value() {
        let view = StationListView::build(false, true, &HashMap::new(), Some(7));
        assert_eq!(view.countdown_text(), "Retrying in 7s.");

        let view = StationListView::build(false, true, &HashMap::new(), Some(3));
        assert_eq!(view.countdown_text(), "Retrying in 3s.");
    }

    #[test]
    fn rows_are_sorted_by_label() {
        let stations = collection(vec![
            station("c", "Gamma", StationStatus::Online, "10.0.0.3", 80),
            station("a", "Alpha", StationStatus::Online, "10.0.0.1", 80),
            station("b", "Beta", StationStatus::Unreachable, "10.0.0.2", 80),
        ]);
        let view = StationListView::build(false, false, &stations, None);

        let labels: Vec<&str> = view.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn equal_labels_tie_break_on_id() {
        let stations = collection(vec![
            station("z", "Bench", StationStatus::Online, "10.0.0.3", 80),
            station("a", "Bench", StationStatus::Online, "10.0.0.1", 80),
            station("m", "Bench", StationStatus::Online, "10.0.0.2", 80),
        ]);

        let ordered: Vec<&str> = sorted_by_label(&stations)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ordered, vec!["a", "m", "z"]);
    }

    #[test]
    fn sorting_tolerates_empty_collection() {
        assert!(sorted_by_label(&HashMap::new()).is_empty());
    }

    #[test]
    fn every_status_renders_a_row() {
        for (i, status) in StationStatus::ALL.into_iter().enumerate() {
            let stations = collection(vec![station(
                "s1",
                "Bench",
                status,
                "10.0.0.1",
                8000 + i as u16,
            )]);
            let view = StationListView::build(false, false, &stations, None);

            let row = &view.rows[0];
            assert!(!row.status_text.is_empty());
            assert_eq!(row.reachable, status.is_reachable());
        }
    }

    #[test]
    fn unreachable_rows_get_marker_class() {
        let reachable = StationRowView::from_station(&station(
            "a",
            "Alpha",
            StationStatus::Online,
            "10.0.0.1",
            80,
        ));
        let down = StationRowView::from_station(&station(
            "b",
            "Beta",
            StationStatus::Unreachable,
            "10.0.0.2",
            80,
        ));

        assert_eq!(reachable.row_class(), "station-row");
        assert_eq!(down.row_class(), "station-row station-unreachable");
    }

    #[test]
    fn detail_view_includes_overview_when_probed() {
        use crate::probe::{RunningTest, StationOverview};

        let mut s = station("a", "Alpha", StationStatus::Running, "10.0.0.1", 80);
        s.test_description = Some("Focus sweep".to_string());

        let overview = StationOverview {
            software_version: Some("1.4.2".to_string()),
            running_test: Some(RunningTest {
                name: "focus_sweep".to_string(),
                description: Some("Sweep the lens".to_string()),
            }),
        };

        let detail = StationDetailView::from_parts(&s, Some(&overview));
        assert_eq!(detail.software_version.as_deref(), Some("1.4.2"));
        assert_eq!(detail.running_test_name.as_deref(), Some("focus_sweep"));
        assert_eq!(detail.status_text, "Running test");
    }

    #[test]
    fn detail_view_without_overview() {
        let s = station("a", "Alpha", StationStatus::Unreachable, "10.0.0.1", 80);
        let detail = StationDetailView::from_parts(&s, None);

        assert!(detail.software_version.is_none());
        assert!(detail.running_test_name.is_none());
        assert!(!detail.reachable);
    }

    // ========== rendered fragment ==========

    #[test]
    fn rendered_error_panel_matches_scenario_d() {
        let view = StationListView::build(false, true, &HashMap::new(), None);
        let html = StationListTemplate { view }.render().unwrap();

        assert!(html.contains("Could not connect to the server."));
        assert!(html.contains("Retrying in…"));
        assert!(html.contains("Try again."));
        assert!(!html.contains("Refresh station list"));
        assert!(!html.contains("No stations found"));
    }

    #[test]
    fn rendered_empty_state_matches_scenario_b() {
        let view = StationListView::build(false, false, &HashMap::new(), None);
        let html = StationListTemplate { view }.render().unwrap();

        assert!(html.contains("Connected to server. No stations found."));
        assert!(html.contains("Refresh station list"));
        assert!(!html.contains("station-list\""));
    }

    #[test]
    fn rendered_list_matches_scenario_c() {
        let stations = collection(vec![station(
            "a",
            "Alpha",
            StationStatus::Online,
            "10.0.0.1",
            80,
        )]);
        let view = StationListView::build(false, false, &stations, None);
        let html = StationListTemplate { view }.render().unwrap();

        assert!(html.contains("Found 1 station."));
        assert!(html.contains("Alpha (Online)"));
        assert!(html.contains("10.0.0.1:80"));
        assert!(html.contains("/stations/a"));
    }

    #[test]
    fn rendered_loading_state_suppresses_actions() {
        let view = StationListView::build(true, false, &HashMap::new(), None);
        let html = StationListTemplate { view }.render().unwrap();

        assert!(html.contains("loading-indicator"));
        assert!(!html.contains("Refresh station list"));
        assert!(!html.contains("No stations found"));
        assert!(!html.contains("Found "));
    }

    #[test]
    fn rendered_row_shows_description_when_present() {
        let mut s = station("a", "Alpha", StationStatus::Online, "10.0.0.1", 80);
        s.test_description = Some("Camera focus sweep".to_string());
        let stations = collection(vec![s]);

        let view = StationListView::build(false, false, &stations, None);
        let html = StationListTemplate { view }.render().unwrap();
        assert!(html.contains("Camera focus sweep"));
    }

    #[test]
    fn rendered_countdown_reflects_emitted_value() {
        let view = StationListView::build(false, true, &HashMap::new(), Some(7));
        let html = StationListTemplate { view }.render().unwrap();
        assert!(html.contains("Retrying in 7s."));
    }
}
