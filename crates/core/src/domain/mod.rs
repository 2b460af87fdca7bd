pub mod allocation;
pub mod client;
pub mod product;
pub mod profile;
pub mod routine;
pub mod scores;
