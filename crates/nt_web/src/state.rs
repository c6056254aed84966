use std::sync::Arc;
use nt_ranking::RankingEngine;

pub struct AppState {
    pub engine: Arc<RankingEngine>,
}

impl AppState {
    pub fn new(engine: Arc<RankingEngine>) -> Self {
        Self { engine }
    }
}
