use crate::entities::prelude::*;
use crate::entities::{aliases, lite_streams, streams};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Shows)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(ShowNames)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Aliases)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Services)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Streams)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Episodes)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(LinkSites)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Links)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Scores)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(PollSites)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Polls)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(LiteStreams)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Upsert keys that are not primary keys. These back the
        // ignore/replace-on-conflict write policies.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_aliases_show_alias")
                    .table(Aliases)
                    .col(aliases::Column::ShowId)
                    .col(aliases::Column::Alias)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_aliases_normalized")
                    .table(Aliases)
                    .col(aliases::Column::Normalized)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_streams_service_show")
                    .table(Streams)
                    .col(streams::Column::ServiceId)
                    .col(streams::Column::ShowId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_streams_service_remote")
                    .table(Streams)
                    .col(streams::Column::ServiceId)
                    .col(streams::Column::RemoteKey)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lite_streams_show_service")
                    .table(LiteStreams)
                    .col(lite_streams::Column::ShowId)
                    .col(lite_streams::Column::Service)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LiteStreams).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Polls).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PollSites).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Scores).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Links).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LinkSites).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Episodes).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Streams).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Services).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Aliases).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ShowNames).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shows).to_owned())
            .await?;
        Ok(())
    }
}
