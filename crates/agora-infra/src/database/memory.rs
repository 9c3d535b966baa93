//! In-memory repositories - used when no database is configured and by
//! the repository test suite.
//!
//! All tables live in one shared store behind a single async `RwLock` so
//! the cascade deletes the database would perform via foreign keys can be
//! emulated here. Data is lost on process restart.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use agora_core::domain::{Answer, Comment, CommentParent, Question, QuestionSummary, User};
use agora_core::error::RepoError;
use agora_core::list::{ListParams, PAGE_SIZE, Page, SortOrder, clamp_page, page_count};
use agora_core::ports::{
    AnswerRepository, BaseRepository, CommentRepository, QuestionRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    questions: HashMap<Uuid, Question>,
    answers: HashMap<Uuid, Answer>,
    comments: HashMap<Uuid, Comment>,
    question_voters: HashMap<Uuid, HashSet<Uuid>>,
    answer_voters: HashMap<Uuid, HashSet<Uuid>>,
    comment_voters: HashMap<Uuid, HashSet<Uuid>>,
}

impl Tables {
    fn answer_count(&self, question_id: Uuid) -> u64 {
        self.answers
            .values()
            .filter(|a| a.question_id == question_id)
            .count() as u64
    }

    fn question_voter_count(&self, question_id: Uuid) -> u64 {
        self.question_voters
            .get(&question_id)
            .map_or(0, |s| s.len() as u64)
    }

    fn username_of(&self, user_id: Uuid) -> Option<&str> {
        self.users.get(&user_id).map(|u| u.username.as_str())
    }
}

/// Shared in-memory store backing one repository handle per entity type.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

/// In-memory user repository.
pub struct MemoryUserRepository {
    store: Arc<MemoryStore>,
}

impl MemoryUserRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for MemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, entity: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username == entity.username || u.email == entity.email)
        {
            return Err(RepoError::Constraint(
                "username or email already taken".to_string(),
            ));
        }
        tables.users.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        tables.users.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// In-memory question repository.
pub struct MemoryQuestionRepository {
    store: Arc<MemoryStore>,
}

impl MemoryQuestionRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Question, Uuid> for MemoryQuestionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Question>, RepoError> {
        Ok(self.store.tables.read().await.questions.get(&id).cloned())
    }

    async fn insert(&self, entity: Question) -> Result<Question, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.questions.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Question) -> Result<Question, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.questions.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        tables.questions.insert(entity.id, entity.clone());
        Ok(entity)
    }

    /// Cascades to answers, comments on the question or its answers, and
    /// every affected voter set, mirroring the database's foreign keys.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.questions.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.question_voters.remove(&id);

        let answer_ids: Vec<Uuid> = tables
            .answers
            .values()
            .filter(|a| a.question_id == id)
            .map(|a| a.id)
            .collect();
        for answer_id in &answer_ids {
            tables.answers.remove(answer_id);
            tables.answer_voters.remove(answer_id);
        }

        tables.comments.retain(|_, c| match c.parent {
            CommentParent::Question(question_id) => question_id != id,
            CommentParent::Answer(answer_id) => !answer_ids.contains(&answer_id),
        });
        let live: HashSet<Uuid> = tables.comments.keys().copied().collect();
        tables.comment_voters.retain(|id, _| live.contains(id));

        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for MemoryQuestionRepository {
    async fn list(&self, params: &ListParams) -> Result<Page<QuestionSummary>, RepoError> {
        let tables = self.store.tables.read().await;

        let keyword = params.keyword.as_ref().map(|k| k.to_lowercase());
        let matches = |q: &Question| -> bool {
            let Some(kw) = &keyword else { return true };
            if q.subject.to_lowercase().contains(kw) || q.content.to_lowercase().contains(kw) {
                return true;
            }
            if tables
                .username_of(q.created_by)
                .is_some_and(|name| name.to_lowercase().contains(kw))
            {
                return true;
            }
            tables
                .answers
                .values()
                .filter(|a| a.question_id == q.id)
                .any(|a| {
                    tables
                        .username_of(a.created_by)
                        .is_some_and(|name| name.to_lowercase().contains(kw))
                })
        };

        // Keyed by question id, so a question with several matching
        // answers still yields one row.
        let mut rows: Vec<QuestionSummary> = tables
            .questions
            .values()
            .filter(|q| matches(q))
            .map(|q| QuestionSummary {
                answer_count: tables.answer_count(q.id),
                voter_count: tables.question_voter_count(q.id),
                question: q.clone(),
            })
            .collect();

        match params.sort {
            SortOrder::Recent => {
                rows.sort_by(|a, b| b.question.created_on.cmp(&a.question.created_on));
            }
            SortOrder::Recommend => rows.sort_by(|a, b| {
                b.voter_count
                    .cmp(&a.voter_count)
                    .then(b.question.created_on.cmp(&a.question.created_on))
            }),
            SortOrder::Popular => rows.sort_by(|a, b| {
                b.answer_count
                    .cmp(&a.answer_count)
                    .then(b.question.created_on.cmp(&a.question.created_on))
            }),
        }

        let total = rows.len() as u64;
        let page = clamp_page(params.page, total);
        let start = ((page - 1) * PAGE_SIZE) as usize;
        let items = rows
            .into_iter()
            .skip(start)
            .take(PAGE_SIZE as usize)
            .collect();

        Ok(Page {
            items,
            page,
            page_count: page_count(total),
            total,
        })
    }

    async fn add_voter(&self, question_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.questions.contains_key(&question_id) {
            return Err(RepoError::NotFound);
        }
        tables
            .question_voters
            .entry(question_id)
            .or_default()
            .insert(user_id);
        Ok(())
    }

    async fn voters(&self, question_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .question_voters
            .get(&question_id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default())
    }
}

/// In-memory answer repository.
pub struct MemoryAnswerRepository {
    store: Arc<MemoryStore>,
}

impl MemoryAnswerRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Answer, Uuid> for MemoryAnswerRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Answer>, RepoError> {
        Ok(self.store.tables.read().await.answers.get(&id).cloned())
    }

    async fn insert(&self, entity: Answer) -> Result<Answer, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.questions.contains_key(&entity.question_id) {
            return Err(RepoError::Constraint("question does not exist".to_string()));
        }
        tables.answers.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Answer) -> Result<Answer, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.answers.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        tables.answers.insert(entity.id, entity.clone());
        Ok(entity)
    }

    /// Cascades to the answer's comments and voter sets.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.answers.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.answer_voters.remove(&id);
        tables
            .comments
            .retain(|_, c| c.parent != CommentParent::Answer(id));
        let live: HashSet<Uuid> = tables.comments.keys().copied().collect();
        tables.comment_voters.retain(|id, _| live.contains(id));
        Ok(())
    }
}

#[async_trait]
impl AnswerRepository for MemoryAnswerRepository {
    async fn find_by_question(&self, question_id: Uuid) -> Result<Vec<Answer>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut answers: Vec<Answer> = tables
            .answers
            .values()
            .filter(|a| a.question_id == question_id)
            .cloned()
            .collect();
        answers.sort_by(|a, b| a.created_on.cmp(&b.created_on));
        Ok(answers)
    }

    async fn add_voter(&self, answer_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.answers.contains_key(&answer_id) {
            return Err(RepoError::NotFound);
        }
        tables
            .answer_voters
            .entry(answer_id)
            .or_default()
            .insert(user_id);
        Ok(())
    }

    async fn voters(&self, answer_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .answer_voters
            .get(&answer_id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default())
    }
}

/// In-memory comment repository.
pub struct MemoryCommentRepository {
    store: Arc<MemoryStore>,
}

impl MemoryCommentRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for MemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.store.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, entity: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.store.tables.write().await;
        let parent_exists = match entity.parent {
            CommentParent::Question(id) => tables.questions.contains_key(&id),
            CommentParent::Answer(id) => tables.answers.contains_key(&id),
        };
        if !parent_exists {
            return Err(RepoError::Constraint("parent does not exist".to_string()));
        }
        tables.comments.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.comments.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        tables.comments.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.comments.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.comment_voters.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn find_by_question(&self, question_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.parent == CommentParent::Question(question_id))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_on.cmp(&b.created_on));
        Ok(comments)
    }

    async fn find_by_answer(&self, answer_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.parent == CommentParent::Answer(answer_id))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_on.cmp(&b.created_on));
        Ok(comments)
    }

    async fn add_voter(&self, comment_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.comments.contains_key(&comment_id) {
            return Err(RepoError::NotFound);
        }
        tables
            .comment_voters
            .entry(comment_id)
            .or_default()
            .insert(user_id);
        Ok(())
    }

    async fn voters(&self, comment_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .comment_voters
            .get(&comment_id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::list::SortOrder;
    use chrono::{Duration, Utc};

    struct Fixture {
        users: MemoryUserRepository,
        questions: MemoryQuestionRepository,
        answers: MemoryAnswerRepository,
        comments: MemoryCommentRepository,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        Fixture {
            users: MemoryUserRepository::new(store.clone()),
            questions: MemoryQuestionRepository::new(store.clone()),
            answers: MemoryAnswerRepository::new(store.clone()),
            comments: MemoryCommentRepository::new(store),
        }
    }

    async fn add_user(f: &Fixture, username: &str) -> User {
        f.users
            .insert(User::new(
                username.to_string(),
                format!("{username}@example.com"),
                "hash".to_string(),
            ))
            .await
            .unwrap()
    }

    async fn add_question(f: &Fixture, subject: &str, author: Uuid) -> Question {
        f.questions
            .insert(Question::new(subject.to_string(), "content".to_string(), author))
            .await
            .unwrap()
    }

    fn params(page: u64, keyword: Option<&str>, sort: SortOrder) -> ListParams {
        ListParams::new(page, keyword.map(str::to_string), sort)
    }

    #[tokio::test]
    async fn default_listing_is_recent_first_ten_per_page() {
        let f = fixture();
        let author = add_user(&f, "alice").await;

        let base = Utc::now();
        for i in 0..12 {
            let mut q = Question::new(format!("q{i}"), "content".to_string(), author.id);
            q.created_on = base + Duration::seconds(i);
            f.questions.insert(q).await.unwrap();
        }

        let page = f
            .questions
            .list(&params(1, None, SortOrder::Recent))
            .await
            .unwrap();

        assert_eq!(page.total, 12);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.items.len(), 10);
        // Newest first.
        assert_eq!(page.items[0].question.subject, "q11");
        assert_eq!(page.items[9].question.subject, "q2");
    }

    #[tokio::test]
    async fn out_of_range_page_clamps_to_last() {
        let f = fixture();
        let author = add_user(&f, "alice").await;
        for i in 0..12 {
            add_question(&f, &format!("q{i}"), author.id).await;
        }

        let page = f
            .questions
            .list(&params(99, None, SortOrder::Recent))
            .await
            .unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 2);

        let page = f
            .questions
            .list(&params(0, None, SortOrder::Recent))
            .await
            .unwrap();
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn recommend_sort_orders_by_votes_then_recency() {
        let f = fixture();
        let author = add_user(&f, "alice").await;

        let base = Utc::now();
        for (i, votes) in [3u64, 1, 2].iter().enumerate() {
            let mut q = Question::new(format!("votes{votes}"), "c".to_string(), author.id);
            q.created_on = base + Duration::seconds(i as i64);
            let q = f.questions.insert(q).await.unwrap();
            for _ in 0..*votes {
                let voter = add_user(&f, &format!("voter{}{}", i, Uuid::new_v4())).await;
                f.questions.add_voter(q.id, voter.id).await.unwrap();
            }
        }

        let page = f
            .questions
            .list(&params(1, None, SortOrder::Recommend))
            .await
            .unwrap();

        let subjects: Vec<&str> = page
            .items
            .iter()
            .map(|s| s.question.subject.as_str())
            .collect();
        assert_eq!(subjects, ["votes3", "votes2", "votes1"]);
    }

    #[tokio::test]
    async fn recommend_sort_breaks_ties_newest_first() {
        let f = fixture();
        let author = add_user(&f, "alice").await;

        let base = Utc::now();
        let mut older = Question::new("older".to_string(), "c".to_string(), author.id);
        older.created_on = base;
        let mut newer = Question::new("newer".to_string(), "c".to_string(), author.id);
        newer.created_on = base + Duration::seconds(5);
        f.questions.insert(older).await.unwrap();
        f.questions.insert(newer).await.unwrap();

        let page = f
            .questions
            .list(&params(1, None, SortOrder::Recommend))
            .await
            .unwrap();

        assert_eq!(page.items[0].question.subject, "newer");
    }

    #[tokio::test]
    async fn popular_sort_orders_by_answer_count() {
        let f = fixture();
        let author = add_user(&f, "alice").await;
        let quiet = add_question(&f, "quiet", author.id).await;
        let busy = add_question(&f, "busy", author.id).await;

        for _ in 0..2 {
            f.answers
                .insert(Answer::new(busy.id, "a".to_string(), author.id))
                .await
                .unwrap();
        }
        f.answers
            .insert(Answer::new(quiet.id, "a".to_string(), author.id))
            .await
            .unwrap();

        let page = f
            .questions
            .list(&params(1, None, SortOrder::Popular))
            .await
            .unwrap();

        assert_eq!(page.items[0].question.subject, "busy");
        assert_eq!(page.items[0].answer_count, 2);
    }

    #[tokio::test]
    async fn keyword_matches_subject_content_and_authors() {
        let f = fixture();
        let asker = add_user(&f, "alice").await;
        let answerer = add_user(&f, "ferris_the_crab").await;

        let by_subject = add_question(&f, "How do Ferris loops work?", asker.id).await;
        let by_content = f
            .questions
            .insert(Question::new(
                "untitled".to_string(),
                "ferris again".to_string(),
                asker.id,
            ))
            .await
            .unwrap();
        let by_answerer = add_question(&f, "unrelated", asker.id).await;
        f.answers
            .insert(Answer::new(by_answerer.id, "an answer".to_string(), answerer.id))
            .await
            .unwrap();
        add_question(&f, "no match here", asker.id).await;

        let page = f
            .questions
            .list(&params(1, Some("FERRIS"), SortOrder::Recent))
            .await
            .unwrap();

        let mut ids: Vec<Uuid> = page.items.iter().map(|s| s.question.id).collect();
        ids.sort();
        let mut expected = vec![by_subject.id, by_content.id, by_answerer.id];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn answer_author_match_yields_question_once() {
        let f = fixture();
        let asker = add_user(&f, "alice").await;
        let answerer = add_user(&f, "bob").await;
        let question = add_question(&f, "subject", asker.id).await;

        // Two answers by the same matching author must not duplicate the
        // question in the result.
        for _ in 0..2 {
            f.answers
                .insert(Answer::new(question.id, "a".to_string(), answerer.id))
                .await
                .unwrap();
        }

        let page = f
            .questions
            .list(&params(1, Some("bob"), SortOrder::Recent))
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].question.id, question.id);
    }

    #[tokio::test]
    async fn voting_twice_keeps_one_membership() {
        let f = fixture();
        let author = add_user(&f, "alice").await;
        let voter = add_user(&f, "bob").await;
        let question = add_question(&f, "subject", author.id).await;

        f.questions.add_voter(question.id, voter.id).await.unwrap();
        f.questions.add_voter(question.id, voter.id).await.unwrap();

        let voters = f.questions.voters(question.id).await.unwrap();
        assert_eq!(voters, vec![voter.id]);
    }

    #[tokio::test]
    async fn deleting_a_question_cascades_transitively() {
        let f = fixture();
        let author = add_user(&f, "alice").await;
        let voter = add_user(&f, "bob").await;

        let question = add_question(&f, "subject", author.id).await;
        let answer = f
            .answers
            .insert(Answer::new(question.id, "a".to_string(), author.id))
            .await
            .unwrap();
        let on_question = f
            .comments
            .insert(Comment::on_question(question.id, "c1".to_string(), author.id))
            .await
            .unwrap();
        let on_answer = f
            .comments
            .insert(Comment::on_answer(answer.id, "c2".to_string(), author.id))
            .await
            .unwrap();
        f.questions.add_voter(question.id, voter.id).await.unwrap();
        f.answers.add_voter(answer.id, voter.id).await.unwrap();

        // An unrelated question must survive.
        let other = add_question(&f, "other", author.id).await;

        f.questions.delete(question.id).await.unwrap();

        assert!(f.questions.find_by_id(question.id).await.unwrap().is_none());
        assert!(f.answers.find_by_id(answer.id).await.unwrap().is_none());
        assert!(f.comments.find_by_id(on_question.id).await.unwrap().is_none());
        assert!(f.comments.find_by_id(on_answer.id).await.unwrap().is_none());
        assert!(f.questions.find_by_id(other.id).await.unwrap().is_some());
        assert!(f.answers.voters(answer.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_an_answer_cascades_to_its_comments() {
        let f = fixture();
        let author = add_user(&f, "alice").await;
        let question = add_question(&f, "subject", author.id).await;
        let answer = f
            .answers
            .insert(Answer::new(question.id, "a".to_string(), author.id))
            .await
            .unwrap();
        let comment = f
            .comments
            .insert(Comment::on_answer(answer.id, "c".to_string(), author.id))
            .await
            .unwrap();

        f.answers.delete(answer.id).await.unwrap();

        assert!(f.comments.find_by_id(comment.id).await.unwrap().is_none());
        assert!(f.questions.find_by_id(question.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_constraint_violation() {
        let f = fixture();
        add_user(&f, "alice").await;

        let result = f
            .users
            .insert(User::new(
                "alice".to_string(),
                "other@example.com".to_string(),
                "hash".to_string(),
            ))
            .await;

        assert!(matches!(result.unwrap_err(), RepoError::Constraint(_)));
    }
}
