use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(AppVersions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(AppVersions::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(AppVersions::Version).string().not_null())
          .col(ColumnDef::new(AppVersions::BuildNumber).string().null())
          .col(ColumnDef::new(AppVersions::Platform).string().not_null())
          .col(
            ColumnDef::new(AppVersions::MinimumRequiredVersion)
              .string()
              .null(),
          )
          .col(ColumnDef::new(AppVersions::ReleaseNotes).json().null())
          .col(ColumnDef::new(AppVersions::ReleaseDate).date().not_null())
          .col(ColumnDef::new(AppVersions::DownloadUrl).string_len(500).null())
          .col(
            ColumnDef::new(AppVersions::ForceUpdate)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(
            ColumnDef::new(AppVersions::IsActive)
              .boolean()
              .not_null()
              .default(true),
          )
          .col(
            ColumnDef::new(AppVersions::IsBeta)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(
            ColumnDef::new(AppVersions::IsRollback)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(AppVersions::Metadata).json().null())
          .col(ColumnDef::new(AppVersions::CreatedBy).big_integer().null())
          .col(ColumnDef::new(AppVersions::UpdatedBy).big_integer().null())
          .col(ColumnDef::new(AppVersions::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(AppVersions::UpdatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("unique_version_platform")
          .table(AppVersions::Table)
          .col(AppVersions::Version)
          .col(AppVersions::Platform)
          .unique()
          .if_not_exists()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(AppVersions::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum AppVersions {
  Table,
  Id,
  Version,
  BuildNumber,
  Platform,
  MinimumRequiredVersion,
  ReleaseNotes,
  ReleaseDate,
  DownloadUrl,
  ForceUpdate,
  IsActive,
  IsBeta,
  IsRollback,
  Metadata,
  CreatedBy,
  UpdatedBy,
  CreatedAt,
  UpdatedAt,
}
