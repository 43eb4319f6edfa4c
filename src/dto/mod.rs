pub mod auth;
pub mod dashboard;
pub mod menu;
pub mod orders;
pub mod reservations;
pub mod users;
