mod answer_sheet;
mod bank;
mod choice;
mod ids;
mod question;
mod report;

pub use answer_sheet::{AnswerSheet, AnswerSheetError};
pub use bank::{BankError, QuestionBank};
pub use choice::{Choice, ChoiceKey, ChoiceKeyError};
pub use ids::{ParseIndexError, QuestionIndex};
pub use question::{ChoiceDraft, QuestionDraft, QuestionError, QuestionRecord};
pub use report::{GradingReport, IncorrectAnswer};
