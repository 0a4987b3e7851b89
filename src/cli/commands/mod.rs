mod episodes;
mod ingest;
mod link;
mod ratings;
mod resolve;
mod show;
mod stream;
mod sync;

pub use episodes::cmd_episodes;
pub use ingest::cmd_ingest;
pub use link::{cmd_link, cmd_lite};
pub use ratings::{cmd_poll, cmd_ratings, cmd_score, cmd_tally};
pub use resolve::cmd_resolve;
pub use show::{
    cmd_show_add, cmd_show_alias, cmd_show_delay, cmd_show_enable, cmd_show_info, cmd_show_list,
    cmd_show_remove, cmd_show_report, cmd_show_set_length,
};
pub use stream::{cmd_stream_active, cmd_stream_bind, cmd_stream_list};
pub use sync::cmd_sync;
