pub use super::aliases::Entity as Aliases;
pub use super::episodes::Entity as Episodes;
pub use super::link_sites::Entity as LinkSites;
pub use super::links::Entity as Links;
pub use super::lite_streams::Entity as LiteStreams;
pub use super::poll_sites::Entity as PollSites;
pub use super::polls::Entity as Polls;
pub use super::scores::Entity as Scores;
pub use super::services::Entity as Services;
pub use super::show_names::Entity as ShowNames;
pub use super::shows::Entity as Shows;
pub use super::streams::Entity as Streams;
