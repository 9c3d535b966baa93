//! Domain entities - the core business objects.

mod answer;
mod comment;
mod owner;
mod question;
mod user;

pub use answer::Answer;
pub use comment::{Comment, CommentParent};
pub use owner::Owner;
pub use question::{Question, QuestionSummary};
pub use user::User;
