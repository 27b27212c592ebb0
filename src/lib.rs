pub mod autopilot;
pub mod config;
pub mod entity;
pub mod forms;
pub mod game;
pub mod input;
pub mod physics;
pub mod player;
pub mod reporting;
pub mod settings;
pub mod snapshot;
pub mod storage;
pub mod upgrades;
pub mod world;
