use crate::modules::watch_time::adapters::outbound::pushed_page_state::PushedPageState;
use crate::modules::watch_time::core::clear_confirmation::ClearConfirmation;
use crate::modules::watch_time::core::ports::WatchTimeStore;
use crate::modules::watch_time::use_cases::clear_watch_time::handler::ClearWatchTimeHandler;
use crate::modules::watch_time::use_cases::summarize_watch_time::handler::SummarizeWatchTimeHandler;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub page_state: Arc<PushedPageState>,
    pub summarize_handler: Arc<SummarizeWatchTimeHandler<dyn WatchTimeStore>>,
    pub clear_handler: Arc<ClearWatchTimeHandler<dyn WatchTimeStore>>,
}

impl AppState {
    pub fn new(page_state: Arc<PushedPageState>, store: Arc<dyn WatchTimeStore>) -> Self {
        Self {
            page_state,
            summarize_handler: Arc::new(SummarizeWatchTimeHandler::new(store.clone())),
            clear_handler: Arc::new(ClearWatchTimeHandler::new(
                store,
                ClearConfirmation::default(),
            )),
        }
    }
}
