use crate::{
    api::Api,
    server::status::{Status, StatusLevel},
};
use std::sync::RwLock;

pub struct AppState {
    pub status: RwLock<Status>,
    pub api: Api,
}

impl AppState {
    pub fn new(api: Api) -> Self {
        let version = api.config.version.clone();
        Self {
            status: RwLock::new(Status {
                version,
                level: StatusLevel::Available,
            }),
            api,
        }
    }
}
