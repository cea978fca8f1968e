pub mod executor;
pub mod game;
pub mod map;
pub mod motion;
pub mod nav;
pub mod utils;

pub use anyhow;
pub use fastrand;
pub use glam;
pub use log;
pub use rustc_hash;

#[macro_export]
macro_rules! error_return {
    ($($arg:tt)+) => { { log::error!($($arg)+); return; } };
}
