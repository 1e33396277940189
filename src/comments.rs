pub mod domain;
pub mod dto;
pub mod repository;
pub mod command;
pub mod controller;
pub mod factory;
