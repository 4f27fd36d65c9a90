use sea_orm::entity::prelude::*;

/// Single-document store: at most one row is meaningful; reads take the
/// most recently updated one.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub bank_name: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub bank_address: String,
    pub swift_code: Option<String>,
    pub routing_number: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
