//! Builders for HTTP state ports over the configured storage.

use std::sync::Arc;

use actix_web::web;

use culinaria::domain::ports::{
    CategoryRepository, PasswordHasher, PhotoStorage, RecipeRepository, RoleRepository,
    UserRepository,
};
use culinaria::domain::{
    AdminProvisioning, CategoryService, CredentialLoginService, EmailAddress, Error, PlainPassword,
    RecipeService, RoleService, UserRegistrationService, UserService, Username,
};
use culinaria::inbound::http::state::{HttpState, HttpStatePorts};
use culinaria::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselRecipeRepository, DieselRoleRepository,
    DieselUserRepository,
};
use culinaria::outbound::security::Argon2PasswordHasher;

use super::config::Storage;

/// One repository per entity, all sharing the same backing store.
struct Repositories<U, R, C, Q> {
    users: Arc<U>,
    roles: Arc<R>,
    categories: Arc<C>,
    recipes: Arc<Q>,
}

type DieselRepositories = Repositories<
    DieselUserRepository,
    DieselRoleRepository,
    DieselCategoryRepository,
    DieselRecipeRepository,
>;

impl DieselRepositories {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            roles: Arc::new(DieselRoleRepository::new(pool.clone())),
            categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
            recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
        }
    }
}

impl<S> Repositories<S, S, S, S> {
    fn shared(store: Arc<S>) -> Self {
        Self {
            users: Arc::clone(&store),
            roles: Arc::clone(&store),
            categories: Arc::clone(&store),
            recipes: store,
        }
    }
}

impl<U, R, C, Q> Repositories<U, R, C, Q>
where
    U: UserRepository + 'static,
    R: RoleRepository + 'static,
    C: CategoryRepository + 'static,
    Q: RecipeRepository + 'static,
{
    fn ports<H, P>(&self, hasher: Arc<H>, photos: Arc<P>) -> HttpStatePorts
    where
        H: PasswordHasher + 'static,
        P: PhotoStorage + 'static,
    {
        HttpStatePorts {
            login: Arc::new(CredentialLoginService::new(
                Arc::clone(&self.users),
                Arc::clone(&self.roles),
                Arc::clone(&hasher),
            )),
            registration: Arc::new(UserRegistrationService::new(
                Arc::clone(&self.users),
                Arc::clone(&self.roles),
                Arc::clone(&hasher),
            )),
            categories: Arc::new(CategoryService::new(
                Arc::clone(&self.categories),
                Arc::clone(&photos),
            )),
            recipes: Arc::new(RecipeService::new(
                Arc::clone(&self.recipes),
                Arc::clone(&self.categories),
                Arc::clone(&photos),
            )),
            roles: Arc::new(RoleService::new(Arc::clone(&self.roles))),
            users: Arc::new(
                UserService::new(Arc::clone(&self.users), Arc::clone(&self.roles), hasher)
                    .with_photo_storage(photos),
            ),
        }
    }

    fn user_service(&self) -> UserService<U, R, Argon2PasswordHasher> {
        UserService::new(
            Arc::clone(&self.users),
            Arc::clone(&self.roles),
            Arc::new(Argon2PasswordHasher::new()),
        )
    }
}

/// Build the shared HTTP state over `storage`.
pub(super) fn build_http_state<P>(storage: &Storage, photos: Arc<P>) -> web::Data<HttpState>
where
    P: PhotoStorage + 'static,
{
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let ports = match storage {
        Storage::Postgres(pool) => DieselRepositories::diesel(pool).ports(hasher, photos),
        Storage::Memory(store) => Repositories::shared(Arc::clone(store)).ports(hasher, photos),
    };
    web::Data::new(HttpState::new(ports))
}

/// Create the bootstrap administrator in `storage` unless the email is taken.
pub async fn provision_admin(
    storage: &Storage,
    username: Username,
    email: EmailAddress,
    password: PlainPassword,
) -> Result<AdminProvisioning, Error> {
    match storage {
        Storage::Postgres(pool) => {
            DieselRepositories::diesel(pool)
                .user_service()
                .provision_admin(username, email, password)
                .await
        }
        Storage::Memory(store) => {
            Repositories::shared(Arc::clone(store))
                .user_service()
                .provision_admin(username, email, password)
                .await
        }
    }
}
