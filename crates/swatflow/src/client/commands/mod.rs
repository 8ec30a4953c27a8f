pub mod controller;
pub mod reset;
pub mod trigger;
pub mod worker;
