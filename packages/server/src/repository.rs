use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entity::article;

/// Persistence for generated articles.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert a new article owned by `owner_id`, stamped with the current time.
    async fn create(
        &self,
        owner_id: i32,
        link: &str,
        content: &str,
    ) -> Result<article::Model, DbErr>;

    /// All articles owned by `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<article::Model>, DbErr>;

    async fn find_by_id(&self, id: i32) -> Result<Option<article::Model>, DbErr>;
}

pub struct SeaOrmArticles {
    db: DatabaseConnection,
}

impl SeaOrmArticles {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ArticleRepository for SeaOrmArticles {
    async fn create(
        &self,
        owner_id: i32,
        link: &str,
        content: &str,
    ) -> Result<article::Model, DbErr> {
        article::ActiveModel {
            user_id: Set(owner_id),
            link: Set(link.to_string()),
            content: Set(content.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<article::Model>, DbErr> {
        article::Entity::find()
            .filter(article::Column::UserId.eq(owner_id))
            .order_by_desc(article::Column::CreatedAt)
            .order_by_desc(article::Column::Id)
            .all(&self.db)
            .await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<article::Model>, DbErr> {
        article::Entity::find_by_id(id).one(&self.db).await
    }
}
