//! Turns free-text completions into quizzes and flashcard decks.
//!
//! Completions come from a text generator that does not reliably follow the
//! requested layout, so nothing here returns an error: when no structure can
//! be recovered the caller gets deterministic content built from the topic.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::study::{
    ArtifactKind, Flashcard, QuizQuestion, StudyArtifact, OPTIONS_PER_QUESTION,
};

pub const QUIZ_LENGTH: usize = 3;
pub const FLASHCARD_LIMIT: usize = 4;

const SECTION_DELIMITER: &str = "---";
const BLANK_LINE: &str = "\n\n";
const FRONT_TAG: &str = "Front:";
const BACK_TAG: &str = "Back:";
const MIN_BLOCK_CHARS: usize = 10;

type FlashcardStrategy = fn(&str) -> Vec<Flashcard>;

const FLASHCARD_STRATEGIES: [(&str, FlashcardStrategy); 3] = [
    ("front_back", tagged_pairs),
    ("numbered", numbered_items),
    ("blocks", paragraph_blocks),
];

fn option_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-D](?:[.)]|\s*\))\s*").expect("option label regex"))
}

fn numbered_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*\d+\.[ \t]*").expect("numbered label regex"))
}

pub fn parse_artifact(text: &str, kind: ArtifactKind, topic: &str) -> StudyArtifact {
    match kind {
        ArtifactKind::Quiz => StudyArtifact::Quiz {
            questions: parse_quiz(text, topic),
        },
        ArtifactKind::Flashcards => StudyArtifact::Flashcards {
            flashcards: parse_flashcards(text, topic),
        },
    }
}

/// Returns between 1 and [`QUIZ_LENGTH`] questions, each with exactly
/// [`OPTIONS_PER_QUESTION`] options.
pub fn parse_quiz(text: &str, topic: &str) -> Vec<QuizQuestion> {
    let normalized = normalize_newlines(text);
    let questions: Vec<QuizQuestion> = split_sections(&normalized)
        .into_iter()
        .take(QUIZ_LENGTH)
        .filter_map(parse_section)
        .collect();

    if questions.is_empty() {
        tracing::debug!(topic, "no quiz structure recovered, using fallback quiz");
        return fallback_quiz(topic);
    }
    questions
}

/// Returns between 1 and [`FLASHCARD_LIMIT`] cards. The first strategy that
/// yields anything wins; later strategies never run.
pub fn parse_flashcards(text: &str, topic: &str) -> Vec<Flashcard> {
    let normalized = normalize_newlines(text);
    let text: &str = &normalized;
    let recovered = FLASHCARD_STRATEGIES.iter().find_map(|(name, strategy)| {
        let cards = strategy(text);
        if cards.is_empty() {
            None
        } else {
            tracing::debug!(strategy = name, count = cards.len(), "flashcards recovered");
            Some(cards)
        }
    });

    let mut cards = recovered.unwrap_or_else(|| {
        tracing::debug!(topic, "no flashcard structure recovered, using fallback deck");
        fallback_flashcards(topic)
    });
    cards.truncate(FLASHCARD_LIMIT);
    cards
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn non_blank_segments<'a>(text: &'a str, delimiter: &str) -> Vec<&'a str> {
    text.split(delimiter)
        .filter(|segment| !segment.trim().is_empty())
        .collect()
}

fn split_sections(text: &str) -> Vec<&str> {
    let sections = non_blank_segments(text, SECTION_DELIMITER);
    if sections.len() <= 1 {
        non_blank_segments(text, BLANK_LINE)
    } else {
        sections
    }
}

fn parse_section(section: &str) -> Option<QuizQuestion> {
    let mut question = String::new();
    let mut options: Vec<String> = Vec::new();
    let mut correct_index = 0;

    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(rest) = strip_label(line, "Question") {
            question = rest.to_string();
        } else if let Some(label) = option_label().find(line) {
            let option = line[label.end()..].trim();
            if !option.is_empty() {
                options.push(option.to_string());
            }
        } else if let Some(rest) = strip_label(line, "Correct") {
            correct_index = answer_index(rest);
        }
    }

    if question.is_empty() || options.len() < 2 {
        return None;
    }

    pad_options(&mut options);
    Some(QuizQuestion {
        question_text: question,
        options,
        // Not re-checked against the padded list: a letter pointing at a
        // placeholder slot is kept as-is.
        correct_index,
    })
}

/// Matches `Label:` or `Label ` at the start of the line and returns the
/// trimmed remainder.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(label)?;
    let rest = match rest.strip_prefix(':') {
        Some(after_colon) => after_colon,
        None if rest.starts_with(' ') => rest,
        None => return None,
    };
    Some(rest.trim())
}

fn answer_index(answer: &str) -> usize {
    match answer.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('B') => 1,
        Some('C') => 2,
        Some('D') => 3,
        _ => 0,
    }
}

fn pad_options(options: &mut Vec<String>) {
    while options.len() < OPTIONS_PER_QUESTION {
        let letter = char::from(b'A' + options.len() as u8);
        options.push(format!("Option {}", letter));
    }
    options.truncate(OPTIONS_PER_QUESTION);
}

/// A `Front:` chunk with no `Back:` before the next `Front:` is dropped.
fn tagged_pairs(text: &str) -> Vec<Flashcard> {
    text.split(FRONT_TAG)
        .skip(1)
        .filter_map(|chunk| {
            let (front, back) = chunk.split_once(BACK_TAG)?;
            card(front, back)
        })
        .collect()
}

fn numbered_items(text: &str) -> Vec<Flashcard> {
    let labels: Vec<_> = numbered_label().find_iter(text).collect();
    labels
        .iter()
        .enumerate()
        .filter_map(|(i, label)| {
            let end = labels.get(i + 1).map_or(text.len(), |next| next.start());
            first_line_and_rest(&text[label.end()..end])
        })
        .collect()
}

fn paragraph_blocks(text: &str) -> Vec<Flashcard> {
    text.split(BLANK_LINE)
        .filter(|block| block.trim().chars().count() > MIN_BLOCK_CHARS)
        .filter_map(first_line_and_rest)
        .collect()
}

fn first_line_and_rest(block: &str) -> Option<Flashcard> {
    let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());
    let front = lines.next()?;
    let back = lines.collect::<Vec<_>>().join(" ");
    card(front, &back)
}

fn card(front: &str, back: &str) -> Option<Flashcard> {
    let (front, back) = (front.trim(), back.trim());
    if front.is_empty() || back.is_empty() {
        return None;
    }
    Some(Flashcard::new(front, back))
}

pub fn fallback_quiz(topic: &str) -> Vec<QuizQuestion> {
    let question = |text: String, options: [&str; 4], correct_index: usize| QuizQuestion {
        question_text: text,
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_index,
    };

    vec![
        question(
            format!("What is the fundamental principle of {}?", topic),
            [
                "Basic understanding of core concepts",
                "Advanced theoretical knowledge",
                "Practical application skills",
                "Memorization of facts",
            ],
            0,
        ),
        question(
            format!("How does {} relate to real-world applications?", topic),
            [
                "No practical applications",
                "Limited to academic settings",
                "Used in various real-world scenarios",
                "Only theoretical concepts",
            ],
            2,
        ),
        question(
            format!("What are the key components of studying {}?", topic),
            [
                "Single approach only",
                "Multiple learning methods",
                "No specific components",
                "Random study techniques",
            ],
            1,
        ),
    ]
}

pub fn fallback_flashcards(topic: &str) -> Vec<Flashcard> {
    vec![
        Flashcard::new(
            format!("What is {}?", topic),
            format!("{} is an important concept in the field of study.", topic),
        ),
        Flashcard::new(
            format!("Key aspects of {}", topic),
            format!(
                "Understanding {} involves learning its fundamental principles and applications.",
                topic
            ),
        ),
        Flashcard::new(
            format!("Why study {}?", topic),
            format!(
                "Studying {} helps develop critical thinking and problem-solving skills.",
                topic
            ),
        ),
        Flashcard::new(
            format!("Applications of {}", topic),
            format!("{} has practical applications in various real-world scenarios.", topic),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_QUESTIONS: &str = "Question: What is 2+2?\nA) 3\nB) 4\nC) 5\nD) 6\nCorrect: B\n---\nQuestion: What is 3+3?\nA) 5\nB) 6\nC) 7\nD) 8\nCorrect: B";

    fn adversarial_inputs() -> Vec<String> {
        vec![
            String::new(),
            "   \n\t\n  ".to_string(),
            "---".to_string(),
            "------\n\n---\n\n".to_string(),
            "lorem ipsum dolor sit amet".to_string(),
            "Question:\nA)\nB)\nCorrect: Z".to_string(),
            "Front:\nBack:".to_string(),
            "1.\n2.\n3.".to_string(),
            "A) orphan option\nB) another".to_string(),
            "🦀".repeat(64),
        ]
    }

    #[test]
    fn parses_delimited_quiz() {
        let questions = parse_quiz(TWO_QUESTIONS, "Arithmetic");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question_text, "What is 2+2?");
        assert_eq!(questions[0].options, vec!["3", "4", "5", "6"]);
        assert_eq!(questions[0].correct_index, 1);
        assert_eq!(questions[1].question_text, "What is 3+3?");
        assert_eq!(questions[1].correct_index, 1);
    }

    #[test]
    fn every_input_yields_bounded_non_empty_output() {
        for input in adversarial_inputs() {
            let quiz = parse_quiz(&input, "Topic");
            assert!((1..=QUIZ_LENGTH).contains(&quiz.len()), "quiz for {:?}", input);
            let deck = parse_flashcards(&input, "Topic");
            assert!((1..=FLASHCARD_LIMIT).contains(&deck.len()), "deck for {:?}", input);
        }
    }

    #[test]
    fn options_are_always_four() {
        let text = "Question: Two options?\nA) yes\nB) no\n---\n\
                    Question: Three options?\nA. one\nB. two\nC. three\n---\n\
                    Question: Too many?\nA) a\nB) b\nC) c\nD) d\nA) e\nB) f";
        let questions = parse_quiz(text, "Counting");
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].options, vec!["yes", "no", "Option C", "Option D"]);
        assert_eq!(questions[1].options, vec!["one", "two", "three", "Option D"]);
        assert_eq!(questions[2].options, vec!["a", "b", "c", "d"]);
        for q in &questions {
            assert_eq!(q.options.len(), OPTIONS_PER_QUESTION);
        }
    }

    #[test]
    fn correct_index_stays_in_bounds() {
        let text = "Question: Missing answer?\nA) x\nB) y\n---\n\
                    Question: Unknown letter?\nA) x\nB) y\nCorrect: E\n---\n\
                    Question: Lowercase letter?\nA) x\nB) y\nC) z\nD) w\nCorrect d) w";
        let questions = parse_quiz(text, "Bounds");
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].correct_index, 0);
        assert_eq!(questions[1].correct_index, 0);
        assert_eq!(questions[2].correct_index, 3);
        assert!(questions.iter().all(|q| q.correct_index < OPTIONS_PER_QUESTION));
    }

    #[test]
    fn correct_letter_pointing_at_placeholder_is_kept() {
        let text = "Question: Only two real options?\nA) real\nB) also real\nCorrect: D";
        let questions = parse_quiz(text, "Padding");
        assert_eq!(questions[0].correct_index, 3);
        assert_eq!(questions[0].options[3], "Option D");
    }

    #[test]
    fn falls_back_to_blank_line_sections() {
        let text = "Question: First?\nA) a\nB) b\nCorrect: A\n\nQuestion: Second?\nA) c\nB) d\nC) e\nCorrect: C";
        let questions = parse_quiz(text, "Sections");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question_text, "First?");
        assert_eq!(questions[1].question_text, "Second?");
        assert_eq!(questions[1].correct_index, 2);
    }

    #[test]
    fn only_first_three_sections_are_considered() {
        let text = "Question: One?\nA) a\nB) b\n---\nnot a question\n---\n\
                    Question: Three?\nA) a\nB) b\n---\nQuestion: Four?\nA) a\nB) b";
        let questions = parse_quiz(text, "Limits");
        let texts: Vec<_> = questions.iter().map(|q| q.question_text.as_str()).collect();
        assert_eq!(texts, vec!["One?", "Three?"]);
    }

    #[test]
    fn last_question_line_wins_and_labels_are_stripped() {
        let text = "Question: draft\nQuestion 2: final wording?\nA ) spaced label\nB) second\nCorrect: b";
        let questions = parse_quiz(text, "Labels");
        assert_eq!(questions[0].question_text, "2: final wording?");
        assert_eq!(questions[0].options[0], "spaced label");
        assert_eq!(questions[0].correct_index, 1);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let text = TWO_QUESTIONS.replace('\n', "\r\n");
        let questions = parse_quiz(&text, "Arithmetic");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].options, vec!["3", "4", "5", "6"]);
    }

    #[test]
    fn unstructured_quiz_uses_topic_fallback() {
        let questions = parse_quiz("The model refused to answer.", "Photosynthesis");
        assert_eq!(questions, fallback_quiz("Photosynthesis"));
        assert_eq!(questions.len(), QUIZ_LENGTH);
        assert!(questions[0].question_text.contains("Photosynthesis"));
        assert_eq!(questions[1].correct_index, 2);
    }

    #[test]
    fn parses_front_back_pairs() {
        let cards = parse_flashcards("Front: Q1\nBack: A1\nFront: Q2\nBack: A2", "Any");
        assert_eq!(cards, vec![Flashcard::new("Q1", "A1"), Flashcard::new("Q2", "A2")]);
    }

    #[test]
    fn multi_line_backs_run_until_next_front() {
        let text = "Intro text\nFront: What is DNA?\nBack: Genetic material\nfound in cells.\n\nFront: RNA?\nBack: A messenger";
        let cards = parse_flashcards(text, "Biology");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front, "What is DNA?");
        assert_eq!(cards[0].back, "Genetic material\nfound in cells.");
        assert_eq!(cards[1].back, "A messenger");
    }

    #[test]
    fn front_without_back_is_dropped_not_merged() {
        let cards = parse_flashcards("Front: A\nFront: B\nBack: C", "Any");
        assert_eq!(cards, vec![Flashcard::new("B", "C")]);
    }

    #[test]
    fn tagged_strategy_takes_precedence() {
        let text = "1. Numbered front\nNumbered back\n\nLong paragraph heading\nparagraph body text\n\nFront: Tagged\nBack: Answer";
        let cards = parse_flashcards(text, "Precedence");
        assert_eq!(cards, vec![Flashcard::new("Tagged", "Answer")]);
    }

    #[test]
    fn caps_deck_at_four_in_encounter_order() {
        let text: String = (1..=6)
            .map(|i| format!("Front: Q{i}\nBack: A{i}\n"))
            .collect();
        let cards = parse_flashcards(&text, "Cap");
        let fronts: Vec<_> = cards.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(fronts, vec!["Q1", "Q2", "Q3", "Q4"]);
    }

    #[test]
    fn parses_numbered_list() {
        let text = "1. What is DNA?\nGenetic material\nof living things.\n2. What is RNA?\nA messenger molecule.\n3. Lonely line";
        let cards = parse_flashcards(text, "Biology");
        assert_eq!(
            cards,
            vec![
                Flashcard::new("What is DNA?", "Genetic material of living things."),
                Flashcard::new("What is RNA?", "A messenger molecule."),
            ]
        );
    }

    #[test]
    fn parses_blank_line_blocks() {
        let text = "Photosynthesis basics\nPlants turn light into sugar.\n\nShort\nx\n\nChlorophyll role\nIt absorbs light\nin the leaves.";
        let cards = parse_flashcards(text, "Plants");
        assert_eq!(
            cards,
            vec![
                Flashcard::new("Photosynthesis basics", "Plants turn light into sugar."),
                Flashcard::new("Chlorophyll role", "It absorbs light in the leaves."),
            ]
        );
    }

    #[test]
    fn empty_text_uses_topic_fallback_deck() {
        let cards = parse_flashcards("", "Photosynthesis");
        assert_eq!(cards.len(), 4);
        assert_eq!(cards, fallback_flashcards("Photosynthesis"));
        assert_eq!(cards[0].front, "What is Photosynthesis?");
        assert!(cards.iter().all(|c| c.back.contains("Photosynthesis")));
    }

    #[test]
    fn parse_artifact_tags_by_kind() {
        let quiz = parse_artifact(TWO_QUESTIONS, ArtifactKind::Quiz, "Math");
        assert_eq!(quiz.kind(), ArtifactKind::Quiz);
        assert_eq!(quiz.item_count(), 2);

        let deck = parse_artifact("", ArtifactKind::Flashcards, "Math");
        assert_eq!(deck.kind(), ArtifactKind::Flashcards);
        let value = serde_json::to_value(&deck).unwrap();
        assert_eq!(value["kind"], "flashcards");
        assert_eq!(value["flashcards"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn quiz_question_uses_wire_field_names() {
        let questions = parse_quiz(TWO_QUESTIONS, "Math");
        let value = serde_json::to_value(&questions[0]).unwrap();
        assert_eq!(value["question"], "What is 2+2?");
        assert_eq!(value["correct"], 1);
        assert_eq!(value["options"][1], "4");
    }
}
