//! Application services

pub mod navigation;

pub use navigation::NavigationService;
