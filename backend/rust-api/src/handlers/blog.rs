use axum::{
    extract::{Path, Query},
    Json,
};

use crate::{
    data::blog::{
        categories, featured_posts, post_by_id, posts_by_category, related_posts, tags, POSTS,
    },
    handlers::error::ApiError,
    models::catalog::{BlogListQuery, BlogPost},
};

pub async fn list_posts(Query(query): Query<BlogListQuery>) -> Json<Vec<&'static BlogPost>> {
    let posts = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => posts_by_category(category),
        _ => POSTS.iter().collect(),
    };
    Json(posts)
}

pub async fn list_featured() -> Json<Vec<&'static BlogPost>> {
    Json(featured_posts())
}

pub async fn list_categories() -> Json<Vec<&'static str>> {
    Json(categories())
}

pub async fn list_tags() -> Json<Vec<&'static str>> {
    Json(tags())
}

pub async fn get_post(Path(id): Path<String>) -> Result<Json<&'static BlogPost>, ApiError> {
    post_by_id(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Blog post {} not found", id)))
}

/// 404 for an unknown post; an empty list when nothing relates.
pub async fn list_related(
    Path(id): Path<String>,
) -> Result<Json<Vec<&'static BlogPost>>, ApiError> {
    if post_by_id(&id).is_none() {
        return Err(ApiError::not_found(format!("Blog post {} not found", id)));
    }
    Ok(Json(related_posts(&id)))
}
