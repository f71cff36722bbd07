use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create graphs table
        manager
            .create_table(
                Table::create()
                    .table(Graphs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Graphs::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Graphs::Type)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Graphs::Title)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Graphs::Data)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Graphs::Extra)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Graphs::Justification)
                            .text()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Graphs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Graphs {
    Table,
    Id,
    Type,
    Title,
    Data,
    Extra,
    Justification,
}
