//! Behaviour of the in-process entity store.

use super::*;
use crate::domain::{EmailAddress, Listing, PasswordHash, RecipeDetails, Username};
use rstest::{fixture, rstest};

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::with_reference_roles()
}

fn new_user(email: &str, role_id: i32) -> NewUser {
    NewUser {
        username: Username::new("ana").expect("valid username"),
        email: EmailAddress::new(email).expect("valid email"),
        password_hash: PasswordHash::new("$argon2id$stub"),
        role_id: RoleId::new(role_id),
    }
}

fn details(title: &str, category_id: CategoryId) -> RecipeDetails {
    RecipeDetails {
        title: title.to_owned(),
        description: "desc".to_owned(),
        ingredients: "ingr".to_owned(),
        instructions: "inst".to_owned(),
        prep_time_minutes: 10,
        servings: 2,
        category_id,
    }
}

fn category_name(raw: &str) -> CategoryName {
    CategoryName::new(raw).expect("valid category name")
}

async fn seed_recipe(store: &InMemoryStore, title: &str, category: CategoryId, author: UserId) {
    seed_recipe_with_photo(store, title, category, author, None).await;
}

async fn seed_recipe_with_photo(
    store: &InMemoryStore,
    title: &str,
    category: CategoryId,
    author: UserId,
    photo: Option<&str>,
) -> Recipe {
    RecipeRepository::create(
        store,
        &NewRecipe {
            details: details(title, category),
            photo_path: photo.map(str::to_owned),
            author_id: author,
        },
    )
    .await
    .expect("recipe inserted")
}

#[rstest]
#[tokio::test]
async fn reference_roles_are_seeded(store: InMemoryStore) {
    let admin = store
        .find_by_name(ADMIN_ROLE_NAME)
        .await
        .expect("query")
        .expect("admin role");
    let default = store
        .find_by_name(DEFAULT_ROLE_NAME)
        .await
        .expect("query")
        .expect("default role");
    assert_eq!(admin.id, RoleId::new(1));
    assert_eq!(default.id, RoleId::new(2));
}

#[rstest]
#[tokio::test]
async fn duplicate_role_names_are_rejected(store: InMemoryStore) {
    let name = RoleName::new(DEFAULT_ROLE_NAME).expect("valid name");
    let error = RoleRepository::create(&store, &name)
        .await
        .expect_err("duplicate");
    assert_eq!(error, EntityStoreError::unique_violation(ROLES_NAME_KEY));
}

#[rstest]
#[tokio::test]
async fn roles_in_use_cannot_be_deleted(store: InMemoryStore) {
    UserRepository::create(&store, &new_user("ana@x.com", 2))
        .await
        .expect("user inserted");
    let error = RoleRepository::delete(&store, RoleId::new(2))
        .await
        .expect_err("restricted");
    assert_eq!(error, EntityStoreError::foreign_key_violation(USERS_ROLE_FKEY));
    assert!(
        RoleRepository::delete(&store, RoleId::new(1))
            .await
            .expect("unused role")
    );
}

#[rstest]
#[tokio::test]
async fn emails_are_unique(store: InMemoryStore) {
    UserRepository::create(&store, &new_user("ana@x.com", 2))
        .await
        .expect("first insert");
    let error = UserRepository::create(&store, &new_user("ana@x.com", 2))
        .await
        .expect_err("duplicate email");
    assert_eq!(error, EntityStoreError::unique_violation(USERS_EMAIL_KEY));
}

#[rstest]
#[tokio::test]
async fn users_need_an_existing_role(store: InMemoryStore) {
    let error = UserRepository::create(&store, &new_user("ana@x.com", 99))
        .await
        .expect_err("unknown role");
    assert_eq!(error, EntityStoreError::foreign_key_violation(USERS_ROLE_FKEY));
}

#[rstest]
#[tokio::test]
async fn user_update_keeps_hash_when_none_given(store: InMemoryStore) {
    let user = UserRepository::create(&store, &new_user("ana@x.com", 2))
        .await
        .expect("insert");
    let updated = UserRepository::update(
        &store,
        &UserChanges {
            id: user.id,
            username: Username::new("ana maría").expect("valid username"),
            email: user.email.clone(),
            password_hash: None,
            role_id: RoleId::new(1),
            expected_revision: 1,
        },
    )
    .await
    .expect("update")
    .expect("row present");
    assert_eq!(updated.password_hash, user.password_hash);
    assert_eq!(updated.role_id, RoleId::new(1));
    assert_eq!(updated.revision, 2);
}

#[rstest]
#[tokio::test]
async fn stale_revisions_are_reported(store: InMemoryStore) {
    let category = CategoryRepository::create(&store, &category_name("Postres"))
        .await
        .expect("insert");
    CategoryRepository::update(&store, category.id, &category_name("Dulces"), 1)
        .await
        .expect("first update")
        .expect("row present");
    let error = CategoryRepository::update(&store, category.id, &category_name("Otros"), 1)
        .await
        .expect_err("stale");
    assert_eq!(error, EntityStoreError::revision_mismatch(1_u32, 2_u32));
}

#[rstest]
#[tokio::test]
async fn updating_a_missing_row_yields_none(store: InMemoryStore) {
    let outcome = CategoryRepository::update(&store, CategoryId::new(42), &category_name("X"), 1)
        .await
        .expect("no error");
    assert!(outcome.is_none());
}

#[rstest]
#[tokio::test]
async fn categories_list_newest_first_in_pages_of_five(store: InMemoryStore) {
    for index in 1..=7 {
        CategoryRepository::create(&store, &category_name(&format!("Cat {index}")))
            .await
            .expect("insert");
    }
    let request = Listing::Categories.page(Some(1));
    let first = CategoryRepository::list_page(&store, request)
        .await
        .expect("page");
    let names: Vec<&str> = first.items().iter().map(|c| c.name.as_ref()).collect();
    assert_eq!(names, ["Cat 7", "Cat 6", "Cat 5", "Cat 4", "Cat 3"]);
    assert_eq!(first.total_pages(), 2);

    let second = CategoryRepository::list_page(&store, Listing::Categories.page(Some(2)))
        .await
        .expect("page");
    assert_eq!(second.items().len(), 2);
}

#[rstest]
#[tokio::test]
async fn deleting_a_category_cascades_to_recipes(store: InMemoryStore) {
    let author = UserRepository::create(&store, &new_user("ana@x.com", 2))
        .await
        .expect("user");
    let postres = CategoryRepository::create(&store, &category_name("Postres"))
        .await
        .expect("category");
    let sopas = CategoryRepository::create(&store, &category_name("Sopas"))
        .await
        .expect("category");
    seed_recipe_with_photo(&store, "Flan", postres.id, author.id, Some("/images/flan.jpg")).await;
    seed_recipe(&store, "Tarta", postres.id, author.id).await;
    seed_recipe_with_photo(&store, "Caldo", sopas.id, author.id, Some("/images/caldo.jpg")).await;

    let photos = CategoryRepository::delete(&store, postres.id)
        .await
        .expect("delete")
        .expect("category existed");
    assert_eq!(photos, ["/images/flan.jpg"]);
    let remaining = RecipeRepository::list_page(
        &store,
        &RecipeFilter::default(),
        Listing::Recipes.page(None),
    )
    .await
    .expect("list");
    assert_eq!(remaining.total_items(), 1);
    assert_eq!(remaining.items()[0].recipe.details.title, "Caldo");
}

#[rstest]
#[tokio::test]
async fn deleting_a_user_cascades_to_their_recipes(store: InMemoryStore) {
    let ana = UserRepository::create(&store, &new_user("ana@x.com", 2))
        .await
        .expect("user");
    let luis = UserRepository::create(&store, &new_user("luis@x.com", 2))
        .await
        .expect("user");
    let category = CategoryRepository::create(&store, &category_name("Postres"))
        .await
        .expect("category");
    seed_recipe_with_photo(&store, "Flan", category.id, ana.id, Some("/images/flan.jpg")).await;
    seed_recipe_with_photo(&store, "Natillas", category.id, luis.id, Some("/images/n.jpg")).await;

    let photos = UserRepository::delete(&store, ana.id)
        .await
        .expect("delete")
        .expect("user existed");
    assert_eq!(photos, ["/images/flan.jpg"]);
    let remaining = RecipeRepository::list_page(
        &store,
        &RecipeFilter::default(),
        Listing::Recipes.page(None),
    )
    .await
    .expect("list");
    assert_eq!(remaining.total_items(), 1);
    assert_eq!(remaining.items()[0].author_name, "ana");
    assert_eq!(remaining.items()[0].recipe.author_id, luis.id);
}

#[rstest]
#[tokio::test]
async fn recipe_filters_combine(store: InMemoryStore) {
    let author = UserRepository::create(&store, &new_user("ana@x.com", 2))
        .await
        .expect("user");
    let postres = CategoryRepository::create(&store, &category_name("Postres"))
        .await
        .expect("category");
    let sopas = CategoryRepository::create(&store, &category_name("Sopas"))
        .await
        .expect("category");
    seed_recipe(&store, "Flan de huevo", postres.id, author.id).await;
    seed_recipe(&store, "flan salado", postres.id, author.id).await;
    seed_recipe(&store, "Sopa de Flan", sopas.id, author.id).await;

    let filter = RecipeFilter::from_query(Some(i64::from(postres.id.get())), Some("Flan".into()));
    let page = RecipeRepository::list_page(&store, &filter, Listing::Recipes.page(None))
        .await
        .expect("list");
    let titles: Vec<&str> = page
        .items()
        .iter()
        .map(|view| view.recipe.details.title.as_str())
        .collect();
    assert_eq!(titles, ["Flan de huevo"]);
    assert_eq!(page.items()[0].category_name, "Postres");
}

#[rstest]
#[tokio::test]
async fn recipes_need_an_existing_category(store: InMemoryStore) {
    let author = UserRepository::create(&store, &new_user("ana@x.com", 2))
        .await
        .expect("user");
    let error = RecipeRepository::create(
        &store,
        &NewRecipe {
            details: details("Flan", CategoryId::new(9)),
            photo_path: None,
            author_id: author.id,
        },
    )
    .await
    .expect_err("unknown category");
    assert_eq!(
        error,
        EntityStoreError::foreign_key_violation(RECIPES_CATEGORY_FKEY)
    );
}

#[rstest]
#[tokio::test]
async fn deleting_twice_reports_absence(store: InMemoryStore) {
    let category = CategoryRepository::create(&store, &category_name("Postres"))
        .await
        .expect("category");
    assert_eq!(
        CategoryRepository::delete(&store, category.id)
            .await
            .expect("first delete"),
        Some(Vec::new())
    );
    assert!(
        CategoryRepository::delete(&store, category.id)
            .await
            .expect("second delete")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn deleting_a_recipe_hands_back_its_photo(store: InMemoryStore) {
    let author = UserRepository::create(&store, &new_user("ana@x.com", 2))
        .await
        .expect("user");
    let category = CategoryRepository::create(&store, &category_name("Postres"))
        .await
        .expect("category");
    let recipe =
        seed_recipe_with_photo(&store, "Flan", category.id, author.id, Some("/images/f.jpg"))
            .await;

    let photos = RecipeRepository::delete(&store, recipe.id)
        .await
        .expect("delete");
    assert_eq!(photos, Some(vec!["/images/f.jpg".to_owned()]));
    assert!(
        RecipeRepository::delete(&store, recipe.id)
            .await
            .expect("second delete")
            .is_none()
    );
}
