use bson::doc;
use mongodb::Database;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

use crate::data::lostfound::{LostFoundItem, LostFoundItemData};
use crate::resp::jwt::UserRoleToken;
use crate::resp::problem::{problems, Problem};
use crate::store::Store;

/// List lost & found items, newest first
#[utoipa::path(
    responses(
        (status = 200, description = "All items", body = Vec<LostFoundItem>),
    ),
    security(("jwt" = []))
)]
#[get("/lost-found")]
#[tracing::instrument(skip(db))]
pub async fn item_list(
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<LostFoundItem>>, Problem> {
    let items = Store::<LostFoundItem>::open(db)
        .list_sorted(None, doc! { "created": -1 })
        .await?;

    Ok(Json(items))
}

/// Get a single item
#[utoipa::path(
    responses(
        (status = 200, description = "The item", body = LostFoundItem),
        (status = 404, description = "No such item", body = Problem),
    ),
    security(("jwt" = []))
)]
#[get("/lost-found/<id>")]
#[tracing::instrument(skip(db))]
pub async fn item_get(
    id: Uuid,
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<LostFoundItem>, Problem> {
    let item = Store::<LostFoundItem>::open(db)
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Item", id))?;

    Ok(Json(item))
}

/// Post a lost or found item
#[utoipa::path(
    request_body = LostFoundItemData,
    responses(
        (status = 200, description = "Created item", body = LostFoundItem),
        (status = 400, description = "Validation failure", body = Problem),
    ),
    security(("jwt" = []))
)]
#[post("/lost-found", format = "application/json", data = "<item>")]
#[tracing::instrument(skip(db))]
pub async fn item_create(
    item: Json<LostFoundItemData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<LostFoundItem>, Problem> {
    item.validate()?;

    let item = item.into_inner().into_item(auth.user);
    Store::<LostFoundItem>::open(db).create(&item).await?;

    Ok(Json(item))
}

/// Update an item
#[utoipa::path(
    request_body = LostFoundItemData,
    responses(
        (status = 200, description = "Updated item", body = LostFoundItem),
        (status = 403, description = "Caller is neither the poster nor an admin", body = Problem),
        (status = 404, description = "No such item", body = Problem),
    ),
    security(("jwt" = []))
)]
#[put("/lost-found/<id>", format = "application/json", data = "<item>")]
#[tracing::instrument(skip(db))]
pub async fn item_update(
    id: Uuid,
    item: Json<LostFoundItemData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<LostFoundItem>, Problem> {
    item.validate()?;

    let store = Store::<LostFoundItem>::open(db);
    let existing = store
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Item", id))?;

    auth.require_owner_or_admin(existing.posted_by)?;

    let updated = item.into_inner().apply_to(&existing);
    store
        .replace(id, &updated)
        .await?
        .ok_or_else(|| problems::not_found("Item", id))?;

    Ok(Json(updated))
}

/// Delete an item
#[utoipa::path(
    responses(
        (status = 200, description = "Id of the removed item", body = String),
        (status = 403, description = "Caller is neither the poster nor an admin", body = Problem),
        (status = 404, description = "No such item", body = Problem),
    ),
    security(("jwt" = []))
)]
#[delete("/lost-found/<id>")]
#[tracing::instrument(skip(db))]
pub async fn item_delete(
    id: Uuid,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<String>, Problem> {
    let store = Store::<LostFoundItem>::open(db);
    let existing = store
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Item", id))?;

    auth.require_owner_or_admin(existing.posted_by)?;

    store.delete(id).await?;

    Ok(Json(id.to_string()))
}
