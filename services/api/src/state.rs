//! Repositories bundled over one authenticated client

use std::sync::Arc;

use auth::AuthPipeline;
use common::Storage;

use crate::{
    client::ApiClient,
    draft::ProfileDraftStore,
    repositories::{
        AccountRepository, CourseRepository, OrderRepository, ProfileRepository,
        UserAdminRepository, VideoRepository,
    },
};

/// Every repository of the API, sharing one pipeline and session
#[derive(Clone)]
pub struct ApiState {
    pub client: ApiClient,
    pub course_repository: CourseRepository,
    pub video_repository: VideoRepository,
    pub order_repository: OrderRepository,
    pub profile_repository: ProfileRepository,
    pub user_admin_repository: UserAdminRepository,
    pub account_repository: AccountRepository,
    pub profile_drafts: ProfileDraftStore,
}

impl ApiState {
    /// Wire every repository to the given pipeline
    ///
    /// `storage` should be the same storage backing the pipeline's session.
    pub fn new(pipeline: AuthPipeline, storage: Arc<dyn Storage>) -> Self {
        let client = ApiClient::new(pipeline);

        Self {
            course_repository: CourseRepository::new(client.clone()),
            video_repository: VideoRepository::new(client.clone()),
            order_repository: OrderRepository::new(client.clone()),
            profile_repository: ProfileRepository::new(client.clone()),
            user_admin_repository: UserAdminRepository::new(client.clone()),
            account_repository: AccountRepository::new(client.clone()),
            profile_drafts: ProfileDraftStore::new(storage),
            client,
        }
    }
}
