use std::{ops::Deref, sync::Arc};

use axum::extract::FromRef;
use surrealdb::{engine::any::Any, Surreal};

use crate::{
    settings::ArcSettings,
    store::{TokenStore, UserStore},
};

pub type SurrealDb = Surreal<Any>;

#[derive(Clone)]
pub struct AppState(Arc<InnerState>);

impl AppState {
    pub fn new(state: InnerState) -> Self {
        Self(Arc::new(state))
    }
}

impl Deref for AppState {
    type Target = InnerState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct InnerState {
    pub settings: ArcSettings,
    pub tokens: Arc<dyn TokenStore>,
    pub users: Arc<dyn UserStore>,
}

impl FromRef<AppState> for ArcSettings {
    fn from_ref(state: &AppState) -> Self {
        state.0.settings.clone()
    }
}
