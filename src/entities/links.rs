use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub show_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub site_id: i32,
    /// The show's key on the external site.
    pub site_key: String,
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
        belongs_to = "super::link_sites::Entity",
        from = "Column::SiteId",
        to = "super::link_sites::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    LinkSites,
}

impl Related<super::shows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shows.def()
    }
}

impl Related<super::link_sites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LinkSites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
