pub mod clock;
pub mod config;
pub mod elements;
pub mod propagation;
pub mod render;
pub mod scene;
pub mod selection;
pub mod session;
pub mod web;
