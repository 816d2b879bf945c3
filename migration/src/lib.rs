pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_app_versions;
mod m20260301_000002_add_query_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260301_000001_create_app_versions::Migration),
      Box::new(m20260301_000002_add_query_indexes::Migration),
    ]
  }
}
