pub mod actor;
pub mod application;
pub mod candidate;
pub mod company;
pub mod favorite;
pub mod featured_company;
pub mod job;
pub mod location;
pub mod pagination;
pub mod user;
