pub mod episode;
pub mod rating;
pub mod registry;
pub mod show;
pub mod stream;
