pub mod bridge;
pub mod browser;
pub mod constants;
pub mod db;
pub mod distraction;
pub mod error;
pub mod models;
pub mod monitor;
pub mod platforms;
pub mod tabs;

mod test_utils;
