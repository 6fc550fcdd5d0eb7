//! All Paths are recorded here for use throughout this codebase
pub mod base {
    pub const HEALTH: &str = "/healthz";
    pub const ABOUT: &str = "/about";
    pub const STATUS: &str = "/status";
}

pub mod clock {
    pub const PING: &str = "/ping";
    pub const RECEIVE: &str = "/receive";
}

pub mod election {
    pub const ELECTION: &str = "/election";
    pub const COORDINATOR: &str = "/coordinator";
}
