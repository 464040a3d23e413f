use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A generated blog post. Rows are written once and never updated.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "article")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    /// Link as submitted, stored verbatim.
    pub link: String,
    #[sea_orm(column_type = "Text")]
    pub content: String, // in Markdown

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
