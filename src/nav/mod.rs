pub mod controller;
pub mod history;
