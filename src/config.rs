//! Tuning constants of the routers.
use derive_builder::Builder;

#[derive(Debug, Clone, PartialEq, Builder)]
pub struct RoutingConfig {
    /// Margin around the envelope of all endpoints and via-points.
    #[builder(default = "20.0")]
    pub outer_margin: f32,

    /// Margin around each connected endpoint's shape.
    #[builder(default = "10.0")]
    pub bounds_margin: f32,

    /// Grid lines closer than this collapse into one.
    #[builder(default = "10.0")]
    pub merge_threshold: f32,

    /// Weight multiplier for edges on start-end, waypoint and midpoint lines.
    #[builder(default = "0.9")]
    pub preferred_line_factor: f32,

    /// Weight multiplier for edges on the outer envelope.
    #[builder(default = "1.05")]
    pub outer_line_factor: f32,

    /// Added to edges leaving or entering a terminal in a disallowed direction.
    #[builder(default = "20000.0")]
    pub direction_penalty: f32,

    /// Added when a search steps onto a vertex already used by an earlier segment.
    #[builder(default = "1_000_000.0")]
    pub revisit_penalty: f32,

    /// Multiplier applied when a step changes direction.
    #[builder(default = "1.03")]
    pub turn_factor: f32,

    /// Scale of the Manhattan-distance estimate used by A*.
    #[builder(default = "0.9")]
    pub heuristic_factor: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        RoutingConfigBuilder::default()
            .build()
            .expect("every field has a default")
    }
}
