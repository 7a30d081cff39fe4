use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{
    ChatController, IndexController, LibraryController, ProjectController, ProviderController,
    SearchController, StudyController,
};

pub struct Router<'a> {
    index_controller: IndexController<'a>,
    search_controller: SearchController<'a>,
    chat_controller: ChatController<'a>,
    study_controller: StudyController<'a>,
    project_controller: ProjectController<'a>,
    library_controller: LibraryController<'a>,
    provider_controller: ProviderController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            index_controller: IndexController::new(container),
            search_controller: SearchController::new(container),
            chat_controller: ChatController::new(container),
            study_controller: StudyController::new(container),
            project_controller: ProjectController::new(container),
            library_controller: LibraryController::new(container),
            provider_controller: ProviderController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Index { paths } => self.index_controller.index(paths).await,
            Commands::Remove { path } => self.index_controller.remove(path).await,
            Commands::Files => self.index_controller.files().await,
            Commands::Search { query, scope } => self.search_controller.search(query, scope).await,
            Commands::Ask {
                question,
                scope,
                attach,
                conversation,
            } => {
                self.chat_controller
                    .ask(question, scope, attach, conversation)
                    .await
            }
            Commands::Conversations => self.chat_controller.list().await,
            Commands::Summarize { path } => self.study_controller.summarize(path).await,
            Commands::Timeline { project } => self.study_controller.timeline(project).await,
            Commands::Exam { project } => self.study_controller.exam(project).await,
            Commands::Quizzes => self.study_controller.quizzes().await,
            Commands::Notebook { conversation_id } => {
                self.study_controller.notebook(conversation_id).await
            }
            Commands::Project(command) => self.project_controller.handle(command).await,
            Commands::Library(command) => self.library_controller.handle(command).await,
            Commands::Models => self.provider_controller.models().await,
            Commands::Mode => self.provider_controller.mode(),
        }
    }
}
