use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Index files or directories (directories are walked, honoring .gitignore)
    Index {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Remove a file from the index
    Remove { path: PathBuf },

    /// List indexed files
    Files,

    Search {
        query: String,

        /// Files the search is restricted to; without any, nothing is searched
        #[arg(short, long, num_args = 1..)]
        scope: Vec<PathBuf>,
    },

    /// Ask a question, optionally continuing a conversation
    Ask {
        question: String,

        #[arg(short, long, num_args = 1..)]
        scope: Vec<PathBuf>,

        /// Read these files directly into context instead of searching the index
        #[arg(short, long, num_args = 1..)]
        attach: Vec<PathBuf>,

        #[arg(short, long)]
        conversation: Option<String>,
    },

    /// List saved conversations
    Conversations,

    /// Summarize a document
    Summarize { path: PathBuf },

    /// Extract a chronological timeline from project material
    Timeline {
        /// Project id or name; defaults to the active project
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Generate a multiple-choice exam from project material
    Exam {
        #[arg(short, long)]
        project: Option<String>,
    },

    /// List saved exams
    Quizzes,

    /// Turn a conversation into study notes
    Notebook { conversation_id: String },

    #[command(subcommand)]
    Project(ProjectCommand),

    /// The always-on global library
    #[command(subcommand)]
    Library(LibraryCommand),

    /// List models installed on the local backend
    Models,

    /// Show which backend the current configuration routes to
    Mode,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    List,
    Create { name: String },
    Rename { project: String, name: String },
    Delete { project: String },
    Activate { project: String },
    Deactivate { project: String },
    AddFile { project: String, path: PathBuf },
    RemoveFile { project: String, file_id: String },
    /// Print the context a project contributes
    Context { project: Option<String> },
}

#[derive(Subcommand)]
pub enum LibraryCommand {
    Add { path: PathBuf },
    /// Remove by the token printed by `library list`
    Remove { token: String },
    List,
    Context,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_index_requires_paths() {
        assert!(TestCli::try_parse_from(["docpilot", "index"]).is_err());
    }

    #[test]
    fn test_ask_with_attachments() {
        let cli = TestCli::try_parse_from([
            "docpilot", "ask", "What is X?", "--attach", "a.md", "b.pdf", "-c", "conv-1",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask {
                attach,
                conversation,
                scope,
                ..
            } => {
                assert_eq!(attach.len(), 2);
                assert!(scope.is_empty());
                assert_eq!(conversation.as_deref(), Some("conv-1"));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_project_subcommand() {
        let cli = TestCli::try_parse_from(["docpilot", "project", "add-file", "My Library", "notes.md"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Project(ProjectCommand::AddFile { .. })
        ));
    }
}
