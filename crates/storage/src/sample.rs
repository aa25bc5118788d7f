use quiz_core::model::{ChoiceDraft, QuestionDraft};

use crate::repository::Dataset;

fn question(
    text: &str,
    passage: Option<&str>,
    choices: [&str; 5],
    answer: &str,
) -> QuestionDraft {
    QuestionDraft {
        text: text.to_string(),
        passage: passage.map(str::to_string),
        choices: ["A", "B", "C", "D", "E"]
            .iter()
            .zip(choices)
            .map(|(key, text)| ChoiceDraft::new(*key, text))
            .collect(),
        answer: answer.to_string(),
        image: None,
    }
}

/// Bundled world-history mock exam used when no dataset file is supplied.
#[must_use]
pub fn sample_dataset() -> Dataset {
    Dataset::new(
        Some("World History Mock Exam".to_string()),
        vec![
            question(
                "Which civilization developed cuneiform writing?",
                None,
                ["Egyptian", "Sumerian", "Harappan", "Minoan", "Olmec"],
                "B",
            ),
            question(
                "Which ruler is described in the passage?",
                Some(
                    "He issued a law code carved on a basalt stele, \
                     opening with the claim that the gods had called him \
                     to bring justice to the land.",
                ),
                ["Ashoka", "Cyrus the Great", "Hammurabi", "Qin Shi Huang", "Ramesses II"],
                "C",
            ),
            question(
                "The Peace of Westphalia (1648) ended which conflict?",
                None,
                [
                    "The Hundred Years' War",
                    "The War of the Roses",
                    "The Thirty Years' War",
                    "The Seven Years' War",
                    "The Napoleonic Wars",
                ],
                "C",
            ),
            question(
                "Which empire built the road network centred on Cusco?",
                None,
                ["Aztec", "Maya", "Olmec", "Inca", "Toltec"],
                "D",
            ),
            question(
                "Which event is most directly associated with the year 1789?",
                None,
                [
                    "The storming of the Bastille",
                    "The fall of Constantinople",
                    "The Glorious Revolution",
                    "The Congress of Vienna",
                    "The Meiji Restoration",
                ],
                "A",
            ),
        ],
    )
}
