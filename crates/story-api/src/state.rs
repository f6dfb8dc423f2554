use std::sync::Arc;

use story_db::Database;
use story_filter::ProfanityFilter;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub filter: ProfanityFilter,
}
