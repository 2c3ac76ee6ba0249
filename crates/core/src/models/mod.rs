pub mod analytics;
pub mod chart;
pub mod holding;
pub mod owner;
pub mod portfolio;
pub mod price;
pub mod settings;
