pub mod capture;
pub mod dispatch_service;
pub mod health_service;
pub mod inbox_service;
pub mod provider;
pub mod stats_service;
