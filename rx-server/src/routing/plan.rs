//! End-to-end hospital routing for one request.

use serde::Serialize;
use tracing::info;

use crate::domain::Coordinate;
use crate::export::{ExportConfig, GraphExporter, GraphView};
use crate::facilities::{FacilityError, FacilityProvider};
use crate::graph::{Criterion, Metric, MultiGraph};

use super::builder::{HospitalSummary, RouteBuilder, USER_VERTEX_ID};
use super::config::RoutingConfig;

/// The chosen facility merged with its winning route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestHospital {
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub distance: Metric,
    pub time: Metric,
    pub mode: String,
}

/// Everything the hospital-graph endpoint returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HospitalRoutes {
    pub graph: GraphView,
    pub hospitals: Vec<HospitalSummary>,
    pub best_hospital: Option<BestHospital>,
}

/// Pick the best route out of the user vertex and attach facility details.
pub fn best_hospital(graph: &MultiGraph, criterion: Criterion) -> Option<BestHospital> {
    let edge = graph.find_best_hospital(USER_VERTEX_ID, criterion)?;
    let vertex = graph.vertex(&edge.to)?;

    Some(BestHospital {
        id: vertex.id.clone(),
        name: vertex.data.name.clone(),
        address: vertex.data.address.clone().unwrap_or_default(),
        lat: vertex.data.lat,
        lon: vertex.data.lon,
        distance: edge.distance,
        time: edge.time,
        mode: edge.mode.clone(),
    })
}

/// Look up facilities around `user`, build the graph and pick the best one.
///
/// An empty facility list is not an error: it yields an empty graph, no
/// hospitals and no best choice.
pub async fn plan_routes<P: FacilityProvider>(
    provider: &P,
    user: Coordinate,
    criterion: Criterion,
    routing: &RoutingConfig,
    export: ExportConfig,
) -> Result<HospitalRoutes, FacilityError> {
    let facilities = provider.nearby(user, routing.search_radius_m).await?;

    if facilities.is_empty() {
        info!(user = %user, "No facilities nearby");
        return Ok(HospitalRoutes::default());
    }

    let plan = RouteBuilder::new(routing).build(user, &facilities);
    let graph = GraphExporter::new(export).export(&plan.graph);
    let best = best_hospital(&plan.graph, criterion);

    info!(
        user = %user,
        hospitals = plan.hospitals.len(),
        best = best.as_ref().map(|b| b.id.as_str()).unwrap_or("-"),
        "Hospital routes planned"
    );

    Ok(HospitalRoutes {
        graph,
        hospitals: plan.hospitals,
        best_hospital: best,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Facility;
    use crate::facilities::{FacilitySource, StaticFacilities};

    struct FailingProvider;

    impl FacilityProvider for FailingProvider {
        async fn nearby(
            &self,
            _center: Coordinate,
            _radius_m: u32,
        ) -> Result<Vec<crate::domain::Facility>, FacilityError> {
            Err(FacilityError::Api {
                status: 504,
                message: "gateway timeout".to_string(),
            })
        }
    }

    fn source(facilities: Vec<Facility>) -> FacilitySource {
        FacilitySource::Static(StaticFacilities::from_facilities(facilities))
    }

    fn user() -> Coordinate {
        Coordinate::new(40.0, -74.0).unwrap()
    }

    #[tokio::test]
    async fn empty_lookup_gives_empty_response() {
        let routes = plan_routes(
            &source(vec![]),
            user(),
            Criterion::Distance,
            &RoutingConfig::default(),
            ExportConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            serde_json::to_value(&routes).unwrap(),
            serde_json::json!({
                "graph": {"nodes": [], "links": []},
                "hospitals": [],
                "best_hospital": null
            })
        );
    }

    #[tokio::test]
    async fn single_facility_response() {
        let h1 = Facility::new("H1", "General Hospital", "1 Main St", 40.01, -74.01);
        let routes = plan_routes(
            &source(vec![h1]),
            user(),
            Criterion::Distance,
            &RoutingConfig::default(),
            ExportConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(routes.graph.nodes.len(), 2);
        assert_eq!(routes.graph.links.len(), 4);
        let from_user: Vec<_> = routes
            .graph
            .links
            .iter()
            .filter(|l| l.source == "user" && l.target == "H1")
            .map(|l| l.label.as_str())
            .collect();
        assert_eq!(from_user, ["driving", "walking"]);

        let best = routes.best_hospital.unwrap();
        assert_eq!(best.id, "H1");
        assert_eq!(best.address, "1 Main St");
        assert_eq!(best.mode, "driving");
        assert_eq!(best.distance, Metric::Value(1.4));
        assert_eq!(best.time, Metric::Value(4.0));
    }

    #[tokio::test]
    async fn best_by_time_prefers_driving() {
        let facilities = vec![
            Facility::new("A", "A", "", 40.02, -74.0),
            Facility::new("B", "B", "", 40.01, -74.0),
        ];
        let routes = plan_routes(
            &source(facilities),
            user(),
            Criterion::Time,
            &RoutingConfig::default(),
            ExportConfig::default(),
        )
        .await
        .unwrap();

        let best = routes.best_hospital.unwrap();
        assert_eq!(best.id, "B");
        assert_eq!(best.mode, "driving");
    }

    #[tokio::test]
    async fn lookup_failure_propagates() {
        let result = plan_routes(
            &FailingProvider,
            user(),
            Criterion::Distance,
            &RoutingConfig::default(),
            ExportConfig::default(),
        )
        .await;

        assert!(matches!(result, Err(FacilityError::Api { status: 504, .. })));
    }

    #[test]
    fn best_hospital_none_without_edges() {
        let graph = MultiGraph::new();
        assert!(best_hospital(&graph, Criterion::Distance).is_none());
    }
}
