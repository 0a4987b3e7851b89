pub mod episode;
pub mod event;
pub mod rating;
pub mod registry;
pub mod show;
pub mod stream;
