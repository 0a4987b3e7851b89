pub mod prelude;

pub mod aliases;
pub mod episodes;
pub mod link_sites;
pub mod links;
pub mod lite_streams;
pub mod poll_sites;
pub mod polls;
pub mod scores;
pub mod services;
pub mod show_names;
pub mod shows;
pub mod streams;
