pub mod access;
pub mod audio;
pub mod auth;
pub mod generation;
pub mod genre;
pub mod session;
pub mod shared;
pub mod user;
pub mod voice;
