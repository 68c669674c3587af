// Selection settings
pub const DOUBLE_CLICK_WINDOW: f64 = 0.3;     // Seconds between clicks that count as a double click
pub const DRAG_SELECT_THRESHOLD: f32 = 0.25;  // World units a press must travel before it becomes a drag

// Formation settings
pub const FORMATION_SPACING: f32 = 0.5;  // Ring radius is FORMATION_SPACING * sqrt(N)

// Movement settings
pub const ARRIVAL_TOLERANCE: f32 = 0.1;  // Distance at which a move snaps to its target
pub const PATROL_WAIT_TIME: f32 = 1.0;   // Pause at each patrol endpoint (seconds)

// Destination ring search
pub const RING_SEARCH_RINGS: u32 = 8;
pub const RING_SEARCH_SAMPLES: u32 = 8;

// Spatial index settings
pub const INDEX_CELL_SIZE: f32 = 4.0;  // Size of each agent index cell

// Economy settings
pub const TREASURY_START: f32 = 5.0;
pub const TREASURY_CAP: f32 = 10.0;
pub const TREASURY_INCOME_INTERVAL: f32 = 3.0;  // Seconds per point of income
pub const SPAWN_RADIUS: f32 = 2.0;              // Spawned units scatter within this radius

// Camera settings
pub const CAMERA_SPEED: f32 = 12.0;
pub const CAMERA_ZOOM_SPEED: f32 = 0.1;
pub const CAMERA_MIN_SCALE: f32 = 0.005;
pub const CAMERA_MAX_SCALE: f32 = 0.1;
pub const CAMERA_INITIAL_SCALE: f32 = 0.03;  // World units per pixel
