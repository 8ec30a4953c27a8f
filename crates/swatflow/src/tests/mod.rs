pub mod utils;

mod iteration;
