// All tunable simulation constants in one place.

// Tick
pub const FIXED_DT: f32 = 1.0 / 60.0;
pub const MAX_FRAME_DT: f32 = 0.04;

// World
pub const WORLD_BOUNDS: f32 = 180.0;
pub const WORLD_Z_RATIO: f32 = 0.6;
pub const WORLD_RECYCLE_RATIO: f32 = 1.6;
pub const ENTITY_INITIAL_SPEED: f32 = 0.2;

// Base population per kind
pub const MOTE_LIMIT: usize = 240;
pub const ASTEROID_LIMIT: usize = 26;
pub const PLANET_LIMIT: usize = 6;
pub const STAR_LIMIT: usize = 2;
pub const BLACK_HOLE_LIMIT: usize = 1;
pub const HUNTER_LIMIT: usize = 6;

// Extra population per unit of difficulty
pub const MOTE_GROWTH: f32 = 40.0;
pub const ASTEROID_GROWTH: f32 = 6.0;
pub const HUNTER_GROWTH: f32 = 2.0;

// Density factors (mass = r^2 * factor)
pub const DENSITY_DEFAULT: f32 = 8.0;
pub const DENSITY_STAR: f32 = 35.0;
pub const DENSITY_BLACK_HOLE: f32 = 45.0;

pub const HUNTER_HP: f32 = 20.0;
pub const ENTITY_HP: f32 = 1.0;
pub const ENTITY_TAGS: [&str; 3] = ["rift", "core", "halo"];

// Gravity
pub const GRAVITY_CONSTANT: f32 = 0.15;
pub const GRAVITY_SOFTENING: f32 = 6.0;
pub const MAX_ACCEL: f32 = 2.5;
pub const MAX_GRAVITY_RESISTANCE: f32 = 0.7;

// Player
pub const PLAYER_START_MASS: f32 = 6.0;
pub const PLAYER_START_RADIUS: f32 = 2.6;
pub const PLAYER_RADIUS_SCALE: f32 = 1.2;
pub const PLAYER_MAX_INTEGRITY: f32 = 100.0;
pub const ABSORB_MASS_FRACTION: f32 = 0.2;
pub const ABSORB_XP_PER_MASS: f32 = 1.4;
pub const ABSORB_MASS_RATIO: f32 = 0.85;
pub const XP_FIRST_THRESHOLD: u32 = 30;
pub const XP_THRESHOLD_GROWTH: f64 = 1.3;
pub const ENERGY_REGEN: f32 = 6.0;
pub const SHIELD_REGEN: f32 = 2.0;

// Abilities
pub const PRIMARY_MAX_COOLDOWN: f32 = 8.0;
pub const PRIMARY_ENERGY_COST: f32 = 25.0;
pub const SECONDARY_MAX_COOLDOWN: f32 = 12.0;
pub const SECONDARY_ENERGY_COST: f32 = 35.0;
pub const WARP_DASH_JITTER: f32 = 4.0;
pub const PHASE_DURATION: f32 = 1.5;
pub const DRONE_CHARGE: f32 = 3.0;
pub const DRONE_DECAY: f32 = 0.4;
pub const DRONE_MAGNET_BONUS: f32 = 6.0;
pub const SIPHON_DURATION: f32 = 4.0;
pub const SIPHON_RANGE_RATIO: f32 = 6.0;
pub const SIPHON_BURN_RATIO: f32 = 2.4;
pub const SIPHON_ENERGY_RATE: f32 = 18.0;
pub const SIPHON_XP_RATE: f32 = 4.0;
pub const SIPHON_BURN_DAMAGE: f32 = 8.0;

// Controls
pub const THRUST_ENERGY_RATE: f32 = 8.0;
pub const BOOST_MIN_ENERGY: f32 = 5.0;
pub const BOOST_SPEED_MULT: f32 = 3.5;
pub const BOOST_ENERGY_RATE: f32 = 25.0;
pub const BRAKE_MIN_ENERGY: f32 = 2.0;
pub const BRAKE_DRAG: f32 = 0.8;
pub const BRAKE_ENERGY_RATE: f32 = 12.0;
pub const ORBIT_ASSIST_DRAG: f32 = 0.12;

// Interactions
pub const HUNTER_SENSE_RADIUS: f32 = 140.0;
pub const HUNTER_STEER: f32 = 0.6;
pub const MAGNET_BASE_RANGE: f32 = 4.0;
pub const MAGNET_PULL: f32 = 6.0;
pub const DIFFICULTY_MASS_SCALE: f32 = 40.0;
pub const DIFFICULTY_MAX: f32 = 4.0;

// Upgrades
pub const UPGRADE_OFFER_COUNT: usize = 3;
pub const FORM_MILESTONE: u32 = 5;
pub const RARITY_COMMON_CUTOFF: f32 = 0.72;
pub const RARITY_RARE_CUTOFF: f32 = 0.92;

// Input
pub const JOYSTICK_RADIUS: f32 = 64.0;
pub const JOYSTICK_DEAD_ZONE: f32 = 8.0;

// Storage
pub const STORAGE_PREFIX: &str = "conscious-particle";
