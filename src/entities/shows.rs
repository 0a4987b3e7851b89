use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub name_en: Option<String>,
    /// Expected episode count; 0 means unknown.
    pub length: i32,
    pub show_type: i32,
    pub has_source: bool,
    pub is_nsfw: bool,
    pub enabled: bool,
    pub delayed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::show_names::Entity")]
    ShowNames,
    #[sea_orm(has_many = "super::aliases::Entity")]
    Aliases,
    #[sea_orm(has_many = "super::streams::Entity")]
    Streams,
    #[sea_orm(has_many = "super::episodes::Entity")]
    Episodes,
    #[sea_orm(has_many = "super::links::Entity")]
    Links,
    #[sea_orm(has_many = "super::scores::Entity")]
    Scores,
    #[sea_orm(has_many = "super::polls::Entity")]
    Polls,
    #[sea_orm(has_many = "super::lite_streams::Entity")]
    LiteStreams,
}

impl Related<super::show_names::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShowNames.def()
    }
}

impl Related<super::aliases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Aliases.def()
    }
}

impl Related<super::streams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Streams.def()
    }
}

impl Related<super::episodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Episodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
