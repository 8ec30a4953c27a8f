macro_rules! create_swatflow_env {
    ($name: literal) => {
        concat!("SWATFLOW_", $name)
    };
}

/// Known environment variables
pub const SWATFLOW_DIR: &str = create_swatflow_env!("DIR");
pub const SWATFLOW_CONFIG: &str = create_swatflow_env!("CONFIG");
pub const SWATFLOW_DEBUG: &str = create_swatflow_env!("DEBUG");

/// Used to find out the user whose jobs should be removed from the scheduler queue.
pub const USER_ENV: &str = "USER";
