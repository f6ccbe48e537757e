//! FitForge: fitness tracking API with generated workout and diet plans.

pub mod ai;
pub mod app;
pub mod auth;
pub mod catalog;
pub mod completions;
pub mod config;
pub mod dashboard;
pub mod diets;
pub mod errors;
pub mod extractors;
pub mod state;
pub mod users;
pub mod workouts;
