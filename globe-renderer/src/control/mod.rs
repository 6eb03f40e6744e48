pub mod hover_controller;
pub mod input;
pub mod rotation_controller;
