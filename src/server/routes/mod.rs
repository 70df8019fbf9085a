pub mod auth;
pub mod clinics;
pub mod pages;
pub mod stats;
