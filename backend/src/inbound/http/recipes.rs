//! Recipe handlers. Any signed-in user may manage recipes; new recipes are
//! attributed to the caller.
//!
//! ```text
//! GET    /api/v1/recipes?page=1&searchString=Flan&categoryId=2
//! POST   /api/v1/recipes {"title":"Flan",...,"photo":{"fileName":"flan.jpg","contentBase64":"..."}}
//! PUT    /api/v1/recipes/5 {..., "revision":1}
//! DELETE /api/v1/recipes/5
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Page;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{RecipeDraft, RecipeEdit};
use crate::domain::{RecipeDetails, RecipeFields, RecipeFilter, RecipeId, RecipeView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RecipePageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    PhotoPayload, decode_photo, parse_revision, recipe_field_error,
};

/// Recipe as exposed over HTTP, joined with its category and author names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    #[schema(example = 5)]
    pub id: i32,
    #[schema(example = "Flan")]
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    #[schema(example = 45)]
    pub prep_time_minutes: u32,
    #[schema(example = 4)]
    pub servings: u32,
    pub category_id: i32,
    #[schema(example = "Postres")]
    pub category_name: String,
    pub author_id: i32,
    #[schema(example = "ana")]
    pub author_name: String,
    /// Public path of the photo, e.g. `/images/<id>.jpg`.
    pub photo_url: Option<String>,
    pub revision: u32,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        let RecipeView {
            recipe,
            category_name,
            author_name,
        } = view;
        let RecipeDetails {
            title,
            description,
            ingredients,
            instructions,
            prep_time_minutes,
            servings,
            category_id,
        } = recipe.details;
        Self {
            id: recipe.id.get(),
            title,
            description,
            ingredients,
            instructions,
            prep_time_minutes,
            servings,
            category_id: category_id.get(),
            category_name,
            author_id: recipe.author_id.get(),
            author_name,
            photo_url: recipe.photo_path,
            revision: recipe.revision,
        }
    }
}

/// Body for creating or editing a recipe.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub prep_time_minutes: i32,
    pub servings: i32,
    pub category_id: i32,
    /// New photo; on edit, omitting it keeps the current one.
    #[serde(default)]
    pub photo: Option<PhotoPayload>,
    /// Revision the client last read; required on update, ignored on create.
    #[serde(default)]
    pub revision: Option<i64>,
}

impl RecipeRequest {
    fn details(&self) -> ApiResult<RecipeDetails> {
        RecipeDetails::try_from(RecipeFields {
            title: self.title.clone(),
            description: self.description.clone(),
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
            prep_time_minutes: self.prep_time_minutes,
            servings: self.servings,
            category_id: self.category_id,
        })
        .map_err(recipe_field_error)
    }
}

/// Listing query for `GET /api/v1/recipes`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    /// 1-based page number; missing or non-positive values mean page 1.
    pub page: Option<i64>,
    /// Case-sensitive substring the title must contain.
    pub search_string: Option<String>,
    /// Only this category; missing or non-positive values mean all.
    pub category_id: Option<i64>,
}

/// List recipes, three per page, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Recipes", body = RecipePageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<web::Json<Page<RecipeResponse>>> {
    session.require_identity(state.clock.utc())?;
    let RecipeListQuery {
        page,
        search_string,
        category_id,
    } = query.into_inner();
    let filter = RecipeFilter::from_query(category_id, search_string);
    let page = state.recipes.list(filter, page).await?;
    Ok(web::Json(page.map(RecipeResponse::from)))
}

/// Fetch one recipe.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i32>,
) -> ApiResult<web::Json<RecipeResponse>> {
    session.require_identity(state.clock.utc())?;
    let view = state.recipes.get(RecipeId::new(id.into_inner())).await?;
    Ok(web::Json(view.into()))
}

/// Create a recipe authored by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity(state.clock.utc())?;
    let body = payload.into_inner();
    let draft = RecipeDraft {
        details: body.details()?,
        photo: decode_photo(body.photo)?,
        author_id: identity.subject_id,
    };
    let created = RecipeResponse::from(state.recipes.create(draft).await?);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/v1/recipes/{}", created.id)))
        .json(created))
}

/// Replace a recipe's content.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}",
    params(("id" = i32, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Stale revision", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[put("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i32>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    session.require_identity(state.clock.utc())?;
    let body = payload.into_inner();
    let edit = RecipeEdit {
        id: RecipeId::new(id.into_inner()),
        details: body.details()?,
        photo: decode_photo(body.photo)?,
        expected_revision: parse_revision(body.revision)?,
    };
    let updated = state.recipes.update(edit).await?;
    Ok(web::Json(updated.into()))
}

/// Delete a recipe.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = i32, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.require_identity(state.clock.utc())?;
    state.recipes.delete(RecipeId::new(id.into_inner())).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
