pub mod chat_controller;
pub mod index_controller;
pub mod library_controller;
pub mod project_controller;
pub mod provider_controller;
pub mod search_controller;
pub mod study_controller;

pub use chat_controller::ChatController;
pub use index_controller::IndexController;
pub use library_controller::LibraryController;
pub use project_controller::ProjectController;
pub use provider_controller::ProviderController;
pub use search_controller::SearchController;
pub use study_controller::StudyController;
