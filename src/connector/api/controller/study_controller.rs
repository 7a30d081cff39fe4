use std::path::PathBuf;

use anyhow::Result;

use crate::domain::Quiz;

use super::super::Container;

pub struct StudyController<'a> {
    container: &'a Container,
}

impl<'a> StudyController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn summarize(&self, path: PathBuf) -> Result<String> {
        Ok(self.container.study_use_case().summarize(&path).await?)
    }

    pub async fn notebook(&self, conversation_id: String) -> Result<String> {
        Ok(self
            .container
            .study_use_case()
            .notebook(&conversation_id)
            .await?)
    }

    pub async fn timeline(&self, project: Option<String>) -> Result<String> {
        Ok(self
            .container
            .study_use_case()
            .timeline(project.as_deref())
            .await?)
    }

    pub async fn exam(&self, project: Option<String>) -> Result<String> {
        let quiz = self
            .container
            .study_use_case()
            .exam(project.as_deref())
            .await?;

        Ok(self.format_quiz(&quiz))
    }

    pub async fn quizzes(&self) -> Result<String> {
        let quizzes = self.container.study_use_case().quizzes().await?;
        if quizzes.is_empty() {
            return Ok("No saved exams.".to_string());
        }

        Ok(quizzes
            .iter()
            .map(|q| format!("{}  {} ({} questions)", q.id(), q.name(), q.questions().len()))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn format_quiz(&self, quiz: &Quiz) -> String {
        let mut output = format!("{}\n{}\n", quiz.name(), "=".repeat(quiz.name().chars().count()));

        for (i, question) in quiz.questions().iter().enumerate() {
            output.push_str(&format!("\n{}. {}\n", i + 1, question.question));
            for (j, option) in question.options.iter().enumerate() {
                let marker = if j == question.correct_index { "*" } else { " " };
                output.push_str(&format!("  {} {}) {}\n", marker, (b'a' + j as u8) as char, option));
            }
            if !question.explanation.is_empty() {
                output.push_str(&format!("    {}\n", question.explanation));
            }
        }

        output.trim_end().to_string()
    }
}
