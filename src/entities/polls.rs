use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "polls")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub show_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub episode: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub poll_site_id: i32,
    /// Provider-side poll identifier, stable per episode.
    pub poll_id: String,
    /// Unix seconds at which the poll was recorded.
    pub timestamp: i64,
    pub score: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shows::Entity",
        from = "Column::ShowId",
        to = "super::shows::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Shows,
    #[sea_orm(
        belongs_to = "super::poll_sites::Entity",
        from = "Column::PollSiteId",
        to = "super::poll_sites::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    PollSites,
}

impl Related<super::shows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shows.def()
    }
}

impl Related<super::poll_sites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PollSites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
