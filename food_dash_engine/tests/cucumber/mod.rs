mod steps;

pub use world::DashboardWorld;
