use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_app_versions::AppVersions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_index(
        Index::create()
          .name("platform_active_beta_index")
          .table(AppVersions::Table)
          .col(AppVersions::Platform)
          .col(AppVersions::IsActive)
          .col(AppVersions::IsBeta)
          .if_not_exists()
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("release_date_active_index")
          .table(AppVersions::Table)
          .col(AppVersions::ReleaseDate)
          .col(AppVersions::IsActive)
          .if_not_exists()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_index(
        Index::drop()
          .name("release_date_active_index")
          .table(AppVersions::Table)
          .to_owned(),
      )
      .await?;

    manager
      .drop_index(
        Index::drop()
          .name("platform_active_beta_index")
          .table(AppVersions::Table)
          .to_owned(),
      )
      .await
  }
}
