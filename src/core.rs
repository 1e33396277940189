pub mod clock;
pub mod command;
pub mod controller;
pub mod domain;
pub mod events;
pub mod repository;
pub mod sharing;
