use std::collections::BTreeMap;

use crate::dto::quiz_dto::GradedAnswer;
use crate::models::quiz::Question;

pub struct GradingService;

impl GradingService {
    /// Scores answers keyed by question index against the stored correct
    /// option text. Indices outside the quiz are ignored; unanswered
    /// questions simply earn nothing.
    pub fn grade(
        questions: &[Question],
        answers: &BTreeMap<usize, String>,
    ) -> (i32, BTreeMap<usize, GradedAnswer>) {
        let mut score = 0;
        let mut graded = BTreeMap::new();

        for (&idx, answer) in answers {
            let Some(question) = questions.get(idx) else {
                continue;
            };
            let correct = answer.trim() == question.correct_answer.trim();
            if correct {
                score += 1;
            }
            graded.insert(
                idx,
                GradedAnswer {
                    answer: answer.clone(),
                    correct,
                    correct_answer: question.correct_answer.clone(),
                },
            );
        }

        (score, graded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(correct: &str) -> Question {
        Question {
            question: "?".into(),
            options: vec![correct.into(), "x".into(), "y".into(), "z".into()],
            correct_answer: correct.into(),
        }
    }

    #[test]
    fn counts_matching_option_text() {
        let questions = vec![q("Paris"), q("Nile"), q("Au")];
        let answers = BTreeMap::from([
            (0, "Paris".to_string()),
            (1, "Amazon".to_string()),
            (2, " Au ".to_string()),
            (9, "Paris".to_string()),
        ]);

        let (score, graded) = GradingService::grade(&questions, &answers);
        assert_eq!(score, 2);
        assert_eq!(graded.len(), 3);
        assert!(!graded[&1].correct);
        assert_eq!(graded[&1].correct_answer, "Nile");
        assert!(!graded.contains_key(&9));
    }
}
