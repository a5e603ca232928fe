pub mod alerts;
pub mod model;
pub mod provider;

pub use alerts::{ format_relative, AlertFeed, AlertFilter };
pub use provider::{ MockSafetyData, SafetyDataProvider };
