pub mod args;
pub mod error;
pub mod model;
pub mod controller {
    pub mod browser;
    pub mod espn;
    pub mod score;
}
pub mod view {
    pub mod score;
}
