pub mod inbox;
pub mod message;
pub mod mime;
pub mod outcome;
pub mod stats;
