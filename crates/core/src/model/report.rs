use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::answer_sheet::{AnswerSheet, AnswerSheetError};
use crate::model::bank::QuestionBank;
use crate::model::choice::ChoiceKey;
use crate::model::ids::QuestionIndex;

/// A question the attempt got wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IncorrectAnswer {
    pub index: QuestionIndex,
    /// `None` when the question was left unanswered.
    pub given: Option<ChoiceKey>,
    pub expected: ChoiceKey,
}

/// Result of grading one frozen answer sheet.
///
/// `outcomes[i]` is true iff question `i` was answered correctly; `incorrect`
/// lists the misses in ascending index order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradingReport {
    outcomes: Vec<bool>,
    correct: usize,
    incorrect: Vec<IncorrectAnswer>,
    graded_at: DateTime<Utc>,
}

impl GradingReport {
    /// Compare every slot of `sheet` against the bank's answer keys.
    ///
    /// # Errors
    ///
    /// Returns `AnswerSheetError::IndexOutOfRange` if the sheet is shorter than the bank.
    pub fn grade(
        bank: &QuestionBank,
        sheet: &AnswerSheet,
        graded_at: DateTime<Utc>,
    ) -> Result<Self, AnswerSheetError> {
        let mut outcomes = Vec::with_capacity(bank.len());
        let mut incorrect = Vec::new();
        let mut correct = 0_usize;

        for question in bank.iter() {
            let index = question.index();
            let given = sheet.get(index)?;
            let expected = question.answer();
            if given == Some(expected) {
                correct += 1;
                outcomes.push(true);
            } else {
                incorrect.push(IncorrectAnswer {
                    index,
                    given,
                    expected,
                });
                outcomes.push(false);
            }
        }

        Ok(Self {
            outcomes,
            correct,
            incorrect,
            graded_at,
        })
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.incorrect.len()
    }

    #[must_use]
    pub fn incorrect(&self) -> &[IncorrectAnswer] {
        &self.incorrect
    }

    /// Whether question `index` was answered correctly; `None` if out of range.
    #[must_use]
    pub fn is_correct(&self, index: QuestionIndex) -> Option<bool> {
        self.outcomes.get(index.value()).copied()
    }

    #[must_use]
    pub fn outcomes(&self) -> &[bool] {
        &self.outcomes
    }

    #[must_use]
    pub fn graded_at(&self) -> DateTime<Utc> {
        self.graded_at
    }

    /// Percentage of correct answers, `0.0` for an empty quiz.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score_percent(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.correct as f64 * 100.0 / self.outcomes.len() as f64
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::{ChoiceDraft, QuestionDraft};
    use crate::time::fixed_now;

    fn bank(answers: &[&str]) -> QuestionBank {
        let drafts = answers.iter().enumerate().map(|(i, answer)| QuestionDraft {
            text: format!("Q{i}"),
            passage: None,
            choices: ["A", "B", "C"]
                .iter()
                .map(|k| ChoiceDraft::new(*k, format!("option {k}")))
                .collect(),
            answer: (*answer).into(),
            image: None,
        });
        QuestionBank::load(drafts).unwrap()
    }

    fn answer(bank: &QuestionBank, sheet: &mut AnswerSheet, keys: &[ChoiceKey]) {
        for (i, key) in keys.iter().enumerate() {
            sheet.set(bank, QuestionIndex::new(i), *key).unwrap();
        }
    }

    #[test]
    fn grades_against_answer_keys() {
        let bank = bank(&["A", "B", "A"]);
        let mut sheet = AnswerSheet::for_bank(&bank);
        answer(&bank, &mut sheet, &[ChoiceKey::A, ChoiceKey::C, ChoiceKey::A]);

        let report = GradingReport::grade(&bank, &sheet, fixed_now()).unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.correct_count(), 2);
        assert_eq!(report.incorrect_count(), 1);
        assert_eq!(
            report.incorrect(),
            &[IncorrectAnswer {
                index: QuestionIndex::new(1),
                given: Some(ChoiceKey::C),
                expected: ChoiceKey::B,
            }]
        );
        assert_eq!(report.outcomes(), &[true, false, true]);
        assert_eq!(report.is_correct(QuestionIndex::new(1)), Some(false));
        assert_eq!(report.is_correct(QuestionIndex::new(3)), None);
    }

    #[test]
    fn incorrect_list_is_in_ascending_order() {
        let bank = bank(&["A", "A", "A", "A"]);
        let mut sheet = AnswerSheet::for_bank(&bank);
        // Fill in reverse to make sure write order does not leak into the report.
        for i in (0..4).rev() {
            sheet.set(&bank, QuestionIndex::new(i), ChoiceKey::B).unwrap();
        }

        let report = GradingReport::grade(&bank, &sheet, fixed_now()).unwrap();
        let indices: Vec<_> = report.incorrect().iter().map(|m| m.index.value()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!((report.score_percent() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unanswered_counts_as_incorrect() {
        let bank = bank(&["C"]);
        let sheet = AnswerSheet::for_bank(&bank);
        let report = GradingReport::grade(&bank, &sheet, fixed_now()).unwrap();
        assert_eq!(report.incorrect()[0].given, None);
    }

    #[test]
    fn empty_bank_scores_zero() {
        let bank = QuestionBank::load(Vec::new()).unwrap();
        let report = GradingReport::grade(&bank, &AnswerSheet::new(0), fixed_now()).unwrap();
        assert_eq!(report.total(), 0);
        assert!((report.score_percent() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn short_sheet_is_rejected() {
        let bank = bank(&["A", "B"]);
        let err = GradingReport::grade(&bank, &AnswerSheet::new(1), fixed_now()).unwrap_err();
        assert!(matches!(err, AnswerSheetError::IndexOutOfRange { .. }));
    }

    #[test]
    fn serializes_for_export() {
        let bank = bank(&["A", "B"]);
        let mut sheet = AnswerSheet::for_bank(&bank);
        answer(&bank, &mut sheet, &[ChoiceKey::A, ChoiceKey::A]);
        let report = GradingReport::grade(&bank, &sheet, fixed_now()).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["correct"], 1);
        assert_eq!(json["incorrect"][0]["index"], 1);
        assert_eq!(json["incorrect"][0]["given"], "A");
        assert_eq!(json["incorrect"][0]["expected"], "B");
    }
}
