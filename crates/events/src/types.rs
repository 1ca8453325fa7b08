//! Well-known event type names published on the bus.

/// A member submitted an answer, whatever its result.
pub const ANSWER_SUBMITTED: &str = "answer.submitted";

/// An answer could not be decided automatically and waits for review.
pub const ANSWER_PENDING_REVIEW: &str = "answer.pending_review";

/// A member answered a question correctly.
pub const QUESTION_SOLVED: &str = "question.solved";

/// An admin reviewed an answer.
pub const ANSWER_REVIEWED: &str = "answer.reviewed";

/// A node was completed through one completion rule.
///
/// Published once per new history row. The payload flag
/// `already_completed` is set when the node had been completed earlier
/// through another rule, so consumers can skip a repeat unlock notice.
pub const NODE_COMPLETED: &str = "node.completed";

pub const SOURCE_ANSWER: &str = "user_question_answer";
pub const SOURCE_QUESTION: &str = "question";
pub const SOURCE_NODE: &str = "node";
