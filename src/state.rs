use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, ImageService, MovieService, ReviewService, SeaOrmAuthService,
    SeaOrmMovieService, SeaOrmReviewService, SeaOrmUserService, UserService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub image_service: Arc<ImageService>,

    pub auth_service: Arc<dyn AuthService>,

    pub movie_service: Arc<dyn MovieService>,

    pub review_service: Arc<dyn ReviewService>,

    pub user_service: Arc<dyn UserService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let image_service = Arc::new(ImageService::new(&config.assets));

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone()))
            as Arc<dyn AuthService>;

        let movie_service = Arc::new(SeaOrmMovieService::new(
            store.clone(),
            image_service.clone(),
        )) as Arc<dyn MovieService>;

        let review_service = Arc::new(SeaOrmReviewService::new(store.clone()))
            as Arc<dyn ReviewService>;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn UserService>;

        Self {
            config: Arc::new(config),
            store,
            image_service,
            auth_service,
            movie_service,
            review_service,
            user_service,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
