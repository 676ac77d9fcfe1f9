//! Askama templates for browser clients.

use askama::Template;

use crate::graph::NOT_AVAILABLE;
use crate::routing::{HospitalRoutes, HospitalSummary};

/// Nearby hospital list fragment.
#[derive(Template)]
#[template(path = "hospital_list.html")]
pub struct HospitalListTemplate {
    pub criterion: &'static str,
    pub hospitals: Vec<HospitalView>,
}

impl HospitalListTemplate {
    pub fn new(routes: &HospitalRoutes, criterion: &'static str) -> Self {
        let best_id = routes.best_hospital.as_ref().map(|b| b.id.as_str());
        let hospitals = routes
            .hospitals
            .iter()
            .map(|h| HospitalView::from_summary(h, best_id == Some(h.id.as_str())))
            .collect();

        Self {
            criterion,
            hospitals,
        }
    }
}

/// Hospital row view model.
#[derive(Debug, Clone)]
pub struct HospitalView {
    pub name: String,
    pub address: String,
    pub distance: String,
    pub time_driving: u32,
    pub time_walking: u32,
    pub is_best: bool,
}

impl HospitalView {
    pub fn from_summary(summary: &HospitalSummary, is_best: bool) -> Self {
        Self {
            name: summary.name.clone(),
            address: summary.address.clone(),
            distance: match summary.distance.as_f64() {
                Some(km) => format!("{km:.1} km"),
                None => NOT_AVAILABLE.to_string(),
            },
            time_driving: summary.time_driving,
            time_walking: summary.time_walking,
            is_best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Metric;

    fn summary(id: &str, distance: f64) -> HospitalSummary {
        HospitalSummary {
            id: id.into(),
            name: format!("Hospital {id}"),
            address: "1 Main St".into(),
            lat: 0.0,
            lon: 0.0,
            distance: Metric::Value(distance),
            time_driving: 4,
            time_walking: 17,
        }
    }

    #[test]
    fn marks_best_row() {
        let routes = HospitalRoutes {
            hospitals: vec![summary("node/1", 2.5), summary("node/2", 1.4)],
            best_hospital: None,
            ..Default::default()
        };
        let tpl = HospitalListTemplate::new(&routes, "distance");
        assert!(tpl.hospitals.iter().all(|h| !h.is_best));
        assert_eq!(tpl.hospitals[1].distance, "1.4 km");
    }

    #[test]
    fn renders_rows() {
        let tpl = HospitalListTemplate {
            criterion: "time",
            hospitals: vec![HospitalView::from_summary(&summary("node/7", 3.0), true)],
        };
        let html = tpl.render().unwrap();
        assert!(html.contains("Hospital node/7"));
        assert!(html.contains("3.0 km"));
        assert!(html.contains("best"));
    }

    #[test]
    fn renders_empty_state() {
        let tpl = HospitalListTemplate {
            criterion: "distance",
            hospitals: vec![],
        };
        assert!(tpl.render().unwrap().contains("No hospitals found nearby"));
    }
}
