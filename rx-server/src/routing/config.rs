//! Travel-model configuration for route building.

/// Parameters that turn straight-line distance into per-mode routes.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingConfig {
    /// Minutes of driving per kilometre.
    pub driving_mins_per_km: f64,

    /// Minutes of walking per kilometre.
    pub walking_mins_per_km: f64,

    /// Walking distance relative to straight-line distance.
    pub walking_distance_factor: f64,

    /// Radius searched for facilities around the user (metres).
    pub search_radius_m: u32,
}

impl RoutingConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        driving_mins_per_km: f64,
        walking_mins_per_km: f64,
        walking_distance_factor: f64,
        search_radius_m: u32,
    ) -> Self {
        Self {
            driving_mins_per_km,
            walking_mins_per_km,
            walking_distance_factor,
            search_radius_m,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            driving_mins_per_km: 3.0,
            walking_mins_per_km: 12.0,
            walking_distance_factor: 1.2,
            search_radius_m: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RoutingConfig::default();
        assert_eq!(config.driving_mins_per_km, 3.0);
        assert_eq!(config.walking_mins_per_km, 12.0);
        assert_eq!(config.walking_distance_factor, 1.2);
        assert_eq!(config.search_radius_m, 5000);
    }

    #[test]
    fn custom_config() {
        let config = RoutingConfig::new(2.0, 10.0, 1.0, 2500);
        assert_eq!(config.driving_mins_per_km, 2.0);
        assert_eq!(config.walking_mins_per_km, 10.0);
        assert_eq!(config.walking_distance_factor, 1.0);
        assert_eq!(config.search_radius_m, 2500);
    }
}
