/// Defines the directory where the simulation result files are saved
pub const DEFAULT_OUT_DIR: &str = "/tmp/boring/results";

/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/boring/test";

/// Marker of the cells in the copper background (plate)
pub const BACKGROUND_MARKER: usize = 0;

/// Marker of the facets on the outer boundary (plate edges and hole arcs)
pub const OUTER_BOUNDARY_MARKER: i32 = -1;

/// Marker of the facets bounding exactly one battery sub-domain
pub const BATTERY_BOUNDARY_MARKER: i32 = 2;
