//! SeaORM repository implementations.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};

use shutter_core::domain::{Comment, Like, NewComment, NewPost, NewUser, Post, User};
use shutter_core::error::RepoError;
use shutter_core::ports::{
    CommentRepository, FollowRepository, LikeRepository, PostRepository, UserRepository,
};

use super::base::{SeaOrmBaseRepository, map_db_err};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::like::{self, Entity as LikeEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

/// SeaORM user repository.
pub type SeaOrmUserRepository = SeaOrmBaseRepository<UserEntity>;

/// SeaORM post repository.
pub type SeaOrmPostRepository = SeaOrmBaseRepository<PostEntity>;

/// SeaORM comment repository.
pub type SeaOrmCommentRepository = SeaOrmBaseRepository<CommentEntity>;

/// SeaORM like repository.
pub type SeaOrmLikeRepository = SeaOrmBaseRepository<LikeEntity>;

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        tracing::debug!(username = %new_user.username, "Creating user");

        let model = user::ActiveModel::from(new_user)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_excluding(&self, exclude: &[i32], limit: u64) -> Result<Vec<User>, RepoError> {
        let mut query = UserEntity::find();
        if !exclude.is_empty() {
            query = query.filter(user::Column::Id.is_not_in(exclude.iter().copied()));
        }

        let result = query
            .order_by_asc(user::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for SeaOrmPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(new_post)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update_caption(&self, id: i32, caption: String) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: Unchanged(id),
            caption: Set(caption),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_by_authors(&self, author_ids: &[i32]) -> Result<Vec<Post>, RepoError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = PostEntity::find()
            .filter(post::Column::UserId.is_in(author_ids.iter().copied()))
            .order_by_desc(post::Column::Timestamp)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_with_dependents(&self, id: i32) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let likes = LikeEntity::delete_many()
            .filter(like::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        let comments = CommentEntity::delete_many()
            .filter(comment::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(
            post_id = id,
            likes = likes.rows_affected,
            comments = comments.rows_affected,
            "Deleted post with dependents"
        );

        Ok(())
    }
}

#[async_trait]
impl CommentRepository for SeaOrmCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel::from(new_comment)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update_text(&self, id: i32, text: String) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: Unchanged(id),
            text: Set(text),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_by_posts(&self, post_ids: &[i32]) -> Result<Vec<Comment>, RepoError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = CommentEntity::find()
            .filter(comment::Column::PostId.is_in(post_ids.iter().copied()))
            .order_by_asc(comment::Column::Timestamp)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_post(&self, post_id: i32) -> Result<u64, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl LikeRepository for SeaOrmLikeRepository {
    async fn find_by_user_and_post(
        &self,
        user_id: i32,
        post_id: i32,
    ) -> Result<Option<Like>, RepoError> {
        let result = LikeEntity::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, user_id: i32, post_id: i32) -> Result<Like, RepoError> {
        let model = like::ActiveModel {
            user_id: Set(user_id),
            post_id: Set(post_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn liked_post_ids(
        &self,
        user_id: i32,
        post_ids: &[i32],
    ) -> Result<HashSet<i32>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let result = LikeEntity::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.is_in(post_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(|l| l.post_id).collect())
    }

    async fn count_by_posts(&self, post_ids: &[i32]) -> Result<HashMap<i32, usize>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, i64)> = LikeEntity::find()
            .select_only()
            .column(like::Column::PostId)
            .column_as(Expr::col(like::Column::Id).count(), "n")
            .filter(like::Column::PostId.is_in(post_ids.iter().copied()))
            .group_by(like::Column::PostId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(post_id, n)| (post_id, n as usize))
            .collect())
    }
}

/// SeaORM follow-edge repository. The table has a composite key, so it does
/// not go through the generic base repository.
pub struct SeaOrmFollowRepository {
    db: DbConn,
}

impl SeaOrmFollowRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FollowRepository for SeaOrmFollowRepository {
    async fn exists(&self, follower_id: i32, followed_id: i32) -> Result<bool, RepoError> {
        let result = FollowEntity::find_by_id((follower_id, followed_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.is_some())
    }

    async fn create(&self, follower_id: i32, followed_id: i32) -> Result<(), RepoError> {
        let edge = follow::ActiveModel {
            follower_id: Set(follower_id),
            followed_id: Set(followed_id),
        };

        FollowEntity::insert(edge)
            .exec_without_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn delete(&self, follower_id: i32, followed_id: i32) -> Result<bool, RepoError> {
        let result = FollowEntity::delete_by_id((follower_id, followed_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn followed_ids(&self, follower_id: i32) -> Result<Vec<i32>, RepoError> {
        let result = FollowEntity::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .order_by_asc(follow::Column::FollowedId)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(|f| f.followed_id).collect())
    }
}
