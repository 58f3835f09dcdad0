pub mod health;

pub mod auth;

pub mod jobs;
pub mod companies;
pub mod applications;
pub mod favorites;
pub mod candidates;
pub mod featured;
pub mod locations;
